//! Scale factor validation and the names derived from it

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::common::error::{BenchError, Result};

static SCALE_FACTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.[0-9]*[1-9])?$").unwrap());

/// Validate `raw` and turn it into a token safe for database and file names.
///
/// The decimal point, if any, becomes an underscore: `"0.01"` -> `"0_01"`.
pub fn normalize(raw: &str) -> Result<String> {
    if !SCALE_FACTOR_RE.is_match(raw) {
        return Err(BenchError::InvalidScaleFactor(raw.to_string()));
    }
    let token = raw.replacen('.', "_", 1);
    tracing::debug!("parse {} -> {}", raw, token);
    Ok(token)
}

/// A validated scale factor.
///
/// Keeps the raw form, which is what the generators expect on their command
/// line, next to the normalized token used for every derived name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleFactor {
    raw: String,
    token: String,
}

impl ScaleFactor {
    pub fn parse(raw: &str) -> Result<Self> {
        let token = normalize(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            token,
        })
    }

    /// The scale factor as given, e.g. `"0.1"`
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The normalized token, e.g. `"0_1"`
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn database(&self) -> String {
        format!("sf{}", self.token)
    }

    pub fn tables_dir(&self, root: &Path) -> PathBuf {
        root.join(format!("tables_sf{}", self.token))
    }

    pub fn queries_dir(&self, root: &Path) -> PathBuf {
        root.join(format!("queries_sf{}", self.token))
    }

    pub fn results_dir(&self, root: &Path) -> PathBuf {
        root.join(format!("results_sf{}", self.token))
    }
}

impl FromStr for ScaleFactor {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
