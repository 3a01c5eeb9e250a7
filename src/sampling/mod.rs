//! System activity sampling around a timed query
//!
//! A [`Sampler`] moves through `idle -> sampling -> stopped` exactly once.
//! `start` returns after every sampling process has produced its first data
//! line and `end` waits for one more before stopping them, so the sampled
//! window always brackets the timed operation.

pub mod parse;
pub mod probe;
pub mod sar;
mod stream;

use std::path::Path;
use std::time::Duration;

use crate::common::error::{BenchError, Result};
use crate::config::{SamplerBackend, SamplingConfig, ToolsConfig};
use crate::exec::Shell;

pub use parse::Sample;
pub use probe::ProbeSampler;
pub use sar::SarSampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Sampling,
    Stopped,
}

impl SamplerState {
    pub fn name(self) -> &'static str {
        match self {
            SamplerState::Idle => "idle",
            SamplerState::Sampling => "sampling",
            SamplerState::Stopped => "stopped",
        }
    }

    fn require(self, expected: SamplerState) -> Result<()> {
        if self == expected {
            Ok(())
        } else {
            Err(BenchError::SamplerState {
                expected: expected.name(),
                actual: self.name(),
            })
        }
    }
}

/// Metric series collected over one sampling session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSet {
    /// CPU user time, percent
    pub users: Vec<Sample>,
    /// Blocks read per second
    pub breads: Vec<Sample>,
    /// Blocks written per second
    pub bwrtns: Vec<Sample>,
}

pub trait Sampler {
    fn state(&self) -> SamplerState;

    /// `idle -> sampling`
    fn start(&mut self) -> Result<()>;

    /// `sampling -> stopped`
    fn end(&mut self) -> Result<()>;

    /// Parse what was captured. Only valid once stopped.
    fn result(&self) -> Result<SampleSet>;
}

#[derive(Debug, Clone, Copy)]
pub struct Handshake {
    pub readiness: Duration,
    pub completion: Duration,
}

impl From<&SamplingConfig> for Handshake {
    fn from(config: &SamplingConfig) -> Self {
        Self {
            readiness: Duration::from_millis(config.readiness_timeout_ms),
            completion: Duration::from_millis(config.completion_timeout_ms),
        }
    }
}

/// Build the configured sampler; raw captures, if any, go under `dir`.
pub fn create_sampler(
    sampling: &SamplingConfig,
    tools: &ToolsConfig,
    shell: &Shell,
    dir: &Path,
) -> Box<dyn Sampler> {
    let handshake = Handshake::from(sampling);
    match sampling.backend {
        SamplerBackend::Sar => Box::new(SarSampler::new(
            shell.clone(),
            tools.sar.clone(),
            dir.to_path_buf(),
            handshake,
        )),
        SamplerBackend::Probe => Box::new(ProbeSampler::new(
            shell.clone(),
            tools.probe.clone(),
            handshake,
        )),
    }
}
