//! Harness configuration
//!
//! Every knob has a default matching the reference PostgreSQL 14 setup, so a
//! TOML file only needs to list what differs. All sections are optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::constants::DEFAULT_LOCALE;
use crate::common::error::{BenchError, Result};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub tools: ToolsConfig,
    pub paths: PathsConfig,
    pub dbgen: DbgenConfig,
    pub load: LoadConfig,
    pub qgen: QgenConfig,
    pub cold_start: ColdStartConfig,
    pub sampling: SamplingConfig,
}

/// Executables the harness shells out to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub createdb: String,
    pub psql: String,
    /// Resolved relative to the table directory it runs in
    pub dbgen: String,
    /// Resolved relative to the query template directory it runs in
    pub qgen: String,
    pub pg_bulkload: String,
    pub sar: String,
    pub probe: String,
    pub sudo: String,
    pub sync: String,
    /// Forced as `LANG` on every child process
    pub locale: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            createdb: "createdb".to_string(),
            psql: "psql".to_string(),
            dbgen: "../dbgen".to_string(),
            qgen: "../qgen".to_string(),
            pg_bulkload: "/usr/pgsql-14/bin/pg_bulkload".to_string(),
            sar: "sar".to_string(),
            probe: "../perf/target/release/perf".to_string(),
            sudo: "sudo".to_string(),
            sync: "sync".to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the per-scale-factor table, query and result trees
    pub work_dir: PathBuf,
    /// Distribution definitions, as seen from the generator's working directory
    pub dists: String,
    pub ddl_script: PathBuf,
    pub ri_script: PathBuf,
    /// Working directory for the query generator (holds the templates)
    pub query_templates: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            dists: "../dists.dss".to_string(),
            ddl_script: PathBuf::from("dss.ddl"),
            ri_script: PathBuf::from("dss.ri"),
            query_templates: PathBuf::from("queries"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DbgenConfig {
    /// Drop the trailing `|` the generator emits unless built with EOL_HANDLING
    pub strip_trailing_delimiter: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// `pg_bulkload`, the faster path
    #[default]
    Bulk,
    /// `COPY ... FROM STDIN` through psql
    Copy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    pub strategy: LoadStrategy,
    /// Also create the pg_hint_plan extension before loading
    pub hint_plan_extension: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            strategy: LoadStrategy::Bulk,
            hint_plan_extension: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QgenConfig {
    /// Post-process generator output whose dialect header was not set up for
    /// PostgreSQL: comment out `where rownum` and add `explain analyze`.
    pub rewrite_for_postgres: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ColdStartConfig {
    pub enabled: bool,
    /// Large file overwritten to flush the RAID controller cache
    pub scratch_file: PathBuf,
    pub block_size: String,
    pub block_count: u32,
    /// systemd unit restarted to empty the database's own buffers
    pub service: String,
}

impl Default for ColdStartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scratch_file: PathBuf::from("/export/data1/kusodeka.dat"),
            block_size: "1G".to_string(),
            block_count: 16,
            service: "postgresql-14".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerBackend {
    /// Two `sar` processes, one for CPU and one for block I/O
    #[default]
    Sar,
    /// A single custom probe emitting integer rows
    Probe,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub backend: SamplerBackend,
    /// How long to wait for the first sample after spawning
    pub readiness_timeout_ms: u64,
    /// How long to wait for one more sample once the query has finished
    pub completion_timeout_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            backend: SamplerBackend::Sar,
            readiness_timeout_ms: 5_000,
            completion_timeout_ms: 5_000,
        }
    }
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| crate::config_err!("{}: {}", path.display(), e))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| BenchError::Config(e.to_string()))
    }
}
