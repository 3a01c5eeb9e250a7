//! Cache eviction before each timed query

use super::Harness;
use crate::common::error::Result;
use crate::exec::{Check, CommandSpec};

impl Harness {
    /// The privileged command sequence that leaves the controller cache, the
    /// page cache and the server's buffers empty, in execution order.
    pub fn cold_start_commands(&self) -> Vec<(&'static str, CommandSpec)> {
        let tools = &self.config.tools;
        let cs = &self.config.cold_start;
        let sudo = || CommandSpec::new(tools.sudo.clone());
        vec![
            (
                "purge RAID controller cache",
                sudo()
                    .args(["dd", "if=/dev/zero"])
                    .arg(format!("of={}", cs.scratch_file.display()))
                    .arg(format!("bs={}", cs.block_size))
                    .arg(format!("count={}", cs.block_count)),
            ),
            ("purge page cache", CommandSpec::new(tools.sync.clone())),
            (
                "drop kernel caches",
                sudo().args(["sysctl", "-w", "vm.drop_caches=3"]),
            ),
            (
                "restart postgresql",
                sudo().args(["systemctl", "restart", cs.service.as_str()]),
            ),
        ]
    }

    pub fn cold_start(&self) -> Result<()> {
        if !self.config.cold_start.enabled {
            tracing::debug!("cold start disabled");
            return Ok(());
        }
        for (step, spec) in self.cold_start_commands() {
            tracing::info!("{}", step);
            self.shell.run(&spec, Check::Enforce)?;
        }
        Ok(())
    }
}
