//! dssbench - decision-support benchmark harness for PostgreSQL
//!
//! Drives the external data generator, query generator, bulk loader and
//! activity reporters through a fixed pipeline and collects per-query timings
//! and CPU / block I/O series into JSON reports.
//!
pub mod common;
pub mod config;
pub mod exec;
pub mod pipeline;
pub mod report;
pub mod sampling;
pub mod scale_factor;

// Re-export common types for convenience
pub use common::{BenchError, Result};

// Re-export configuration for convenience
pub use config::{HarnessConfig, LoadStrategy, SamplerBackend};

// Re-export pipeline entry points for convenience
pub use pipeline::{all_queries, parse_query_list, Harness};
pub use report::{QueryRecord, RunReport};
pub use sampling::{Sample, SampleSet, Sampler, SamplerState};
pub use scale_factor::ScaleFactor;
