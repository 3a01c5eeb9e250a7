//! Loading generated tables into the database

use std::fs;
use std::path::{Path, PathBuf};

use super::Harness;
use crate::common::constants::{TABLE_DELIMITER, TABLE_FILE_SUFFIX};
use crate::common::error::{BenchError, Result};
use crate::config::LoadStrategy;
use crate::exec::{Check, CommandSpec};
use crate::scale_factor::ScaleFactor;

impl Harness {
    pub fn load(&self, sf: &ScaleFactor) -> Result<()> {
        let dir = sf.tables_dir(&self.root);
        tracing::info!("load {} from {}", sf.database(), dir.display());

        // both may already exist from an earlier run
        self.psql_statement(sf, "CREATE EXTENSION pg_bulkload;", Check::Tolerate)?;
        if self.config.load.hint_plan_extension {
            self.psql_statement(sf, "CREATE EXTENSION pg_hint_plan;", Check::Tolerate)?;
        }

        for (table, path) in table_files(&dir)? {
            tracing::info!("load {}", path.display());
            let spec = match self.config.load.strategy {
                LoadStrategy::Bulk => self.bulk_load_spec(sf, &table, &path),
                LoadStrategy::Copy => self.copy_spec(sf, &table, &path),
            };
            self.shell.run(&spec.current_dir(&dir), Check::Enforce)?;
        }
        Ok(())
    }

    fn bulk_load_spec(&self, sf: &ScaleFactor, table: &str, path: &Path) -> CommandSpec {
        let file_name = path.file_name().unwrap_or(path.as_os_str());
        CommandSpec::new(self.config.tools.pg_bulkload.clone())
            .args(["-d", sf.database().as_str(), "-i"])
            .arg(file_name)
            .args(["-O", table])
            .args(["-o".to_string(), format!("DELIMITER={TABLE_DELIMITER}")])
    }

    fn copy_spec(&self, sf: &ScaleFactor, table: &str, path: &Path) -> CommandSpec {
        CommandSpec::new(self.config.tools.psql.clone())
            .args(["-d", sf.database().as_str(), "-c"])
            .arg(format!("copy {table} from STDIN (delimiter '{TABLE_DELIMITER}');"))
            .stdin_file(path)
    }
}

/// `(table, path)` for every file in `dir`, sorted by name.
///
/// Anything that is not a `.tbl` file means the directory is not a clean
/// generator output and is rejected.
pub fn table_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut tables = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let table = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(TABLE_FILE_SUFFIX))
            .map(str::to_string);
        match table {
            Some(table) if !table.is_empty() => tables.push((table, path)),
            _ => return Err(BenchError::UnexpectedTableFile(path)),
        }
    }
    tables.sort();
    Ok(tables)
}
