//! Database creation, schema and referential-integrity scripts

use super::Harness;
use crate::common::error::Result;
use crate::exec::{Check, CommandSpec};
use crate::scale_factor::ScaleFactor;

impl Harness {
    pub fn createdb(&self, sf: &ScaleFactor) -> Result<()> {
        tracing::info!("createdb {}", sf.database());
        let spec = CommandSpec::new(self.config.tools.createdb.clone()).arg(sf.database());
        self.shell.run(&spec, Check::Enforce)
    }

    pub fn ddl(&self, sf: &ScaleFactor) -> Result<()> {
        tracing::info!("ddl");
        self.psql_script(sf, &self.root.join(&self.config.paths.ddl_script))
    }

    pub fn ri(&self, sf: &ScaleFactor) -> Result<()> {
        tracing::info!("ri");
        self.psql_script(sf, &self.root.join(&self.config.paths.ri_script))
    }

    fn psql_script(&self, sf: &ScaleFactor, script: &std::path::Path) -> Result<()> {
        let database = sf.database();
        let spec = CommandSpec::new(self.config.tools.psql.clone())
            .args(["-d", database.as_str(), "-f"])
            .arg(script);
        self.shell.run(&spec, Check::Enforce)
    }

    /// `psql -c <statement>`; used for extension setup, which may already exist.
    pub(crate) fn psql_statement(
        &self,
        sf: &ScaleFactor,
        statement: &str,
        check: Check,
    ) -> Result<()> {
        let database = sf.database();
        let spec = CommandSpec::new(self.config.tools.psql.clone())
            .args(["-d", database.as_str(), "-c", statement]);
        self.shell.run(&spec, check)
    }
}
