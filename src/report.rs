//! Result records and their JSON form

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::common::error::Result;
use crate::sampling::{Sample, SampleSet};

/// Timestamp -> value in sampling order, as printed by the reporter
pub type Series = IndexMap<String, String>;

fn to_series(samples: Vec<Sample>) -> Series {
    samples.into_iter().map(|s| (s.time, s.value)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub users: Series,
    pub breads: Series,
    pub bwrtns: Series,
}

impl From<SampleSet> for MetricSeries {
    fn from(set: SampleSet) -> Self {
        Self {
            users: to_series(set.users),
            breads: to_series(set.breads),
            bwrtns: to_series(set.bwrtns),
        }
    }
}

/// Outcome of one query. Timing-only runs carry no metric series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub execution_time: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricSeries>,
}

impl QueryRecord {
    pub fn timing(execution_time: impl Into<String>) -> Self {
        Self {
            execution_time: execution_time.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(execution_time: impl Into<String>, samples: SampleSet) -> Self {
        Self {
            execution_time: execution_time.into(),
            metrics: Some(samples.into()),
        }
    }
}

/// Query index -> record in run order; serializes with the index as a string
/// key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    pub queries: IndexMap<u32, QueryRecord>,
}

impl RunReport {
    /// A repeated query keeps its first position and takes the new record.
    pub fn insert(&mut self, query: u32, record: QueryRecord) {
        self.queries.insert(query, record);
    }

    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Four-space indented document, the layout of `all.json`.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_pretty_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
