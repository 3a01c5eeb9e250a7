//! `sar`-based sampler: one process for CPU, one for block I/O

use std::fs;
use std::path::PathBuf;

use super::parse::{block_io_sample, cpu_sample, Sample};
use super::stream::SampledProcess;
use super::{Handshake, SampleSet, Sampler, SamplerState};
use crate::common::constants::{SAMPLE_INTERVAL_SECS, SAR_BLOCK_FILE, SAR_CPU_FILE};
use crate::common::error::Result;
use crate::exec::{CommandSpec, Shell};

fn is_cpu_line(line: &str) -> bool {
    cpu_sample(line).is_some()
}

fn is_block_line(line: &str) -> bool {
    block_io_sample(line).is_some()
}

pub struct SarSampler {
    shell: Shell,
    program: String,
    dir: PathBuf,
    handshake: Handshake,
    state: SamplerState,
    cpu: Option<SampledProcess>,
    block: Option<SampledProcess>,
    cpu_lines: Vec<String>,
    block_lines: Vec<String>,
}

impl SarSampler {
    pub fn new(shell: Shell, program: String, dir: PathBuf, handshake: Handshake) -> Self {
        Self {
            shell,
            program,
            dir,
            handshake,
            state: SamplerState::Idle,
            cpu: None,
            block: None,
            cpu_lines: Vec::new(),
            block_lines: Vec::new(),
        }
    }

    fn spec(&self, flag: &str) -> CommandSpec {
        CommandSpec::new(self.program.clone())
            .arg(flag)
            .arg(SAMPLE_INTERVAL_SECS.to_string())
    }

    fn persist(&self, file: &str, lines: &[String]) -> Result<()> {
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(self.dir.join(file), text)?;
        Ok(())
    }
}

impl Sampler for SarSampler {
    fn state(&self) -> SamplerState {
        self.state
    }

    fn start(&mut self) -> Result<()> {
        self.state.require(SamplerState::Idle)?;
        fs::create_dir_all(&self.dir)?;

        let cpu = SampledProcess::spawn(&self.shell, &self.spec("-u"), is_cpu_line)?;
        let block = SampledProcess::spawn(&self.shell, &self.spec("-b"), is_block_line)?;
        cpu.wait_for_samples(1, self.handshake.readiness)?;
        block.wait_for_samples(1, self.handshake.readiness)?;
        tracing::debug!("sar ready in {}", self.dir.display());

        self.cpu = Some(cpu);
        self.block = Some(block);
        self.state = SamplerState::Sampling;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.state.require(SamplerState::Sampling)?;

        for process in [self.cpu.as_ref(), self.block.as_ref()].into_iter().flatten() {
            let seen = process.sample_count();
            if let Err(e) = process.wait_for_samples(seen + 1, self.handshake.completion) {
                tracing::warn!("no trailing sample: {}", e);
            }
        }
        if let Some(mut cpu) = self.cpu.take() {
            self.cpu_lines = cpu.terminate()?;
        }
        if let Some(mut block) = self.block.take() {
            self.block_lines = block.terminate()?;
        }
        self.state = SamplerState::Stopped;

        self.persist(SAR_CPU_FILE, &self.cpu_lines)?;
        self.persist(SAR_BLOCK_FILE, &self.block_lines)?;
        Ok(())
    }

    fn result(&self) -> Result<SampleSet> {
        self.state.require(SamplerState::Stopped)?;

        let users = self
            .cpu_lines
            .iter()
            .filter_map(|line| cpu_sample(line))
            .collect();
        let mut breads = Vec::new();
        let mut bwrtns = Vec::new();
        for io in self.block_lines.iter().filter_map(|line| block_io_sample(line)) {
            breads.push(Sample::new(io.time.clone(), io.bread));
            bwrtns.push(Sample::new(io.time, io.bwrtn));
        }
        Ok(SampleSet {
            users,
            breads,
            bwrtns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::BenchError;
    use std::time::Duration;

    fn handshake() -> Handshake {
        Handshake {
            readiness: Duration::from_secs(5),
            completion: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_out_of_order_calls_are_state_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut sampler = SarSampler::new(
            Shell::new("C.UTF-8"),
            "sar".to_string(),
            dir.path().join("1"),
            handshake(),
        );
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(matches!(
            sampler.end(),
            Err(BenchError::SamplerState { expected: "sampling", actual: "idle" })
        ));
        assert!(matches!(
            sampler.result(),
            Err(BenchError::SamplerState { expected: "stopped", actual: "idle" })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_with_fake_sar() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let sar = dir.path().join("sar");
        fs::write(
            &sar,
            "#!/bin/sh\n\
             echo 'Linux 5.14.0 (bench) 10/18/2026 _x86_64_ (4 CPU)'\n\
             echo\n\
             while true; do\n\
               t=$(date +%H:%M:%S)\n\
               if [ \"$1\" = \"-u\" ]; then\n\
                 echo \"$t all 12.34 0.00 1.20 0.00 0.00 86.46\"\n\
               else\n\
                 echo \"$t 0.00 0.00 3.00 120.00 45.00 0.00\"\n\
               fi\n\
               sleep 0.1\n\
             done\n",
        )
        .unwrap();
        fs::set_permissions(&sar, fs::Permissions::from_mode(0o755)).unwrap();

        let out = dir.path().join("results").join("3");
        let mut sampler = SarSampler::new(
            Shell::new("C.UTF-8"),
            sar.to_string_lossy().into_owned(),
            out.clone(),
            handshake(),
        );
        sampler.start().unwrap();
        assert_eq!(sampler.state(), SamplerState::Sampling);
        assert!(matches!(sampler.start(), Err(BenchError::SamplerState { .. })));
        sampler.end().unwrap();
        assert_eq!(sampler.state(), SamplerState::Stopped);

        let set = sampler.result().unwrap();
        assert!(set.users.len() >= 2);
        assert_eq!(set.breads.len(), set.bwrtns.len());
        assert!(set.breads.len() >= 2);
        assert!(set.users.iter().all(|s| s.value == "12.34"));
        assert!(set.breads.iter().all(|s| s.value == "120.00"));
        assert!(set.bwrtns.iter().all(|s| s.value == "45.00"));

        let raw = fs::read_to_string(out.join(SAR_CPU_FILE)).unwrap();
        assert!(raw.starts_with("Linux"));
        assert!(out.join(SAR_BLOCK_FILE).exists());
    }
}
