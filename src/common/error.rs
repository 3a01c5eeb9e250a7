//! Error handling for the benchmark harness

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("invalid scale factor {0:?}")]
    InvalidScaleFactor(String),

    #[error("invalid query list {0:?}: {1}")]
    InvalidQueryList(String, String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("no \"Execution Time\" line in output of query {query}")]
    MissingExecutionTime { query: u32 },

    #[error("unexpected file in table directory: {0}")]
    UnexpectedTableFile(PathBuf),

    #[error("sampler is {actual}, expected {expected}")]
    SamplerState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("sampler `{program}` produced no sample within {timeout_ms} ms")]
    SamplerTimeout { program: String, timeout_ms: u64 },

    #[error("sampler `{program}` exited before producing enough samples")]
    SamplerExited { program: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BenchError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_err {
    ($msg:expr) => {
        $crate::common::error::BenchError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::BenchError::Config(format!($fmt, $($arg)*))
    };
}
