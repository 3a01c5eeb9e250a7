//! The benchmark pipeline: provisioning, data, queries and measurement
//!
//! Every stage is a method on [`Harness`], which owns the configuration and
//! the shell used to reach the external tools. Stages are strictly
//! sequential; `all` chains them in order.

pub mod cold_start;
pub mod datagen;
pub mod load;
pub mod measure;
pub mod provision;
pub mod querygen;

use std::path::{Path, PathBuf};

use crate::common::constants::QUERY_COUNT;
use crate::common::error::{BenchError, Result};
use crate::config::HarnessConfig;
use crate::exec::Shell;
use crate::report::RunReport;
use crate::scale_factor::ScaleFactor;

pub use datagen::strip_trailing_delimiter;
pub use load::table_files;
pub use querygen::rewrite_for_postgres;

pub struct Harness {
    config: HarnessConfig,
    shell: Shell,
    root: PathBuf,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let shell = Shell::new(config.tools.locale.clone());
        let root = config.paths.work_dir.clone();
        Self {
            config,
            shell,
            root,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Directory the per-scale-factor trees live under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run every stage for `sf`; `prepared` skips table and query generation.
    pub fn all(&self, sf: &ScaleFactor, prepared: bool) -> Result<RunReport> {
        tracing::info!("all (sf {}, prepared: {})", sf, prepared);
        self.createdb(sf)?;
        self.ddl(sf)?;
        if !prepared {
            self.dbgen(sf)?;
        }
        self.load(sf)?;
        self.ri(sf)?;
        if !prepared {
            self.qgen(sf)?;
        }
        self.analyze(sf, &all_queries())
    }
}

/// Indices of every query template, `1..=10`
pub fn all_queries() -> Vec<u32> {
    (1..=QUERY_COUNT).collect()
}

/// Parse a comma-separated list such as `"1,3,5"` into query indices.
pub fn parse_query_list(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .map(|item| {
            let item = item.trim();
            let query: u32 = item.parse().map_err(|_| {
                BenchError::InvalidQueryList(list.to_string(), format!("{item:?} is not a number"))
            })?;
            if !(1..=QUERY_COUNT).contains(&query) {
                return Err(BenchError::InvalidQueryList(
                    list.to_string(),
                    format!("{query} is outside 1..={QUERY_COUNT}"),
                ));
            }
            Ok(query)
        })
        .collect()
}
