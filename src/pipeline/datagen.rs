//! Table data generation

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::{table_files, Harness};
use crate::common::constants::TABLE_DELIMITER;
use crate::common::error::Result;
use crate::exec::{Check, CommandSpec};
use crate::scale_factor::ScaleFactor;

impl Harness {
    /// Generate `tables_sf*/*.tbl`. The generator's exit status is ignored:
    /// it reports failure when asked to overwrite files that already exist.
    pub fn dbgen(&self, sf: &ScaleFactor) -> Result<()> {
        let dir = sf.tables_dir(&self.root);
        tracing::info!("dbgen into {}", dir.display());
        fs::create_dir_all(&dir)?;

        let spec = CommandSpec::new(self.config.tools.dbgen.clone())
            .args(["-f", "-s", sf.as_str(), "-b", self.config.paths.dists.as_str()])
            .current_dir(&dir);
        self.shell.run(&spec, Check::Tolerate)?;

        if self.config.dbgen.strip_trailing_delimiter {
            for (_, path) in table_files(&dir)? {
                tracing::info!("fix {}", path.display());
                strip_trailing_delimiter(&path)?;
            }
        }
        Ok(())
    }
}

/// Remove one trailing `|` from every line of `path`, in place.
pub fn strip_trailing_delimiter(path: &Path) -> Result<()> {
    let tmp = path.with_extension("tbl.tmp");
    {
        let mut reader = BufReader::new(File::open(path)?);
        let mut writer = BufWriter::new(File::create(&tmp)?);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let (body, newline) = match line.strip_suffix('\n') {
                Some(body) => (body, "\n"),
                None => (line.as_str(), ""),
            };
            let body = body.strip_suffix(TABLE_DELIMITER).unwrap_or(body);
            writer.write_all(body.as_bytes())?;
            writer.write_all(newline.as_bytes())?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
