//! Sampler backed by a single custom probe process.
//!
//! The probe prints one header line and then one row of integers per second;
//! see [`probe_row`] for the column layout.

use super::parse::{probe_row, Sample};
use super::stream::SampledProcess;
use super::{Handshake, SampleSet, Sampler, SamplerState};
use crate::common::error::Result;
use crate::exec::{CommandSpec, Shell};

fn is_probe_line(line: &str) -> bool {
    probe_row(line).is_some()
}

pub struct ProbeSampler {
    shell: Shell,
    program: String,
    handshake: Handshake,
    state: SamplerState,
    process: Option<SampledProcess>,
    lines: Vec<String>,
}

impl ProbeSampler {
    pub fn new(shell: Shell, program: String, handshake: Handshake) -> Self {
        Self {
            shell,
            program,
            handshake,
            state: SamplerState::Idle,
            process: None,
            lines: Vec::new(),
        }
    }
}

impl Sampler for ProbeSampler {
    fn state(&self) -> SamplerState {
        self.state
    }

    fn start(&mut self) -> Result<()> {
        self.state.require(SamplerState::Idle)?;
        let spec = CommandSpec::new(self.program.clone());
        let process = SampledProcess::spawn(&self.shell, &spec, is_probe_line)?;
        process.wait_for_samples(1, self.handshake.readiness)?;
        self.process = Some(process);
        self.state = SamplerState::Sampling;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.state.require(SamplerState::Sampling)?;
        if let Some(mut process) = self.process.take() {
            let seen = process.sample_count();
            if let Err(e) = process.wait_for_samples(seen + 1, self.handshake.completion) {
                tracing::warn!("no trailing sample: {}", e);
            }
            self.lines = process.terminate()?;
        }
        self.state = SamplerState::Stopped;
        Ok(())
    }

    fn result(&self) -> Result<SampleSet> {
        self.state.require(SamplerState::Stopped)?;
        let mut set = SampleSet::default();
        // first line is the column header
        for row in self.lines.iter().skip(1).filter_map(|line| probe_row(line)) {
            set.users.push(Sample::new(row.time.clone(), row.user));
            set.breads.push(Sample::new(row.time.clone(), row.bread));
            set.bwrtns.push(Sample::new(row.time, row.bwrtn));
        }
        Ok(set)
    }
}
