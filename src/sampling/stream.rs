//! A sampling subprocess whose stdout is collected by a reader thread.
//!
//! The reader counts lines accepted by a sample predicate and wakes waiters on
//! every new line, which is what the readiness and completion handshakes of
//! the samplers block on.

use std::io::{BufRead, BufReader};
use std::process::Child;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::common::error::{BenchError, Result};
use crate::exec::{CommandSpec, Shell};

#[derive(Debug, Default)]
struct Capture {
    lines: Vec<String>,
    samples: usize,
    closed: bool,
}

#[derive(Debug, Default)]
struct Shared {
    capture: Mutex<Capture>,
    cond: Condvar,
}

pub(crate) struct SampledProcess {
    program: String,
    child: Child,
    shared: Arc<Shared>,
    reader: Option<JoinHandle<()>>,
    terminated: bool,
}

impl SampledProcess {
    pub(crate) fn spawn(
        shell: &Shell,
        spec: &CommandSpec,
        is_sample: fn(&str) -> bool,
    ) -> Result<Self> {
        let mut child = shell.spawn_piped(spec)?;
        let program = spec.to_string();
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BenchError::SamplerExited { program });
        };

        let shared = Arc::new(Shared::default());
        let reader_shared = Arc::clone(&shared);
        let spawned = std::thread::Builder::new()
            .name(format!("sampler-{}", spec.program()))
            .spawn(move || {
                let mut stdout = BufReader::new(stdout);
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    match stdout.read_until(b'\n', &mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    let mut capture = reader_shared.capture.lock();
                    if is_sample(&line) {
                        capture.samples += 1;
                    }
                    capture.lines.push(line);
                    drop(capture);
                    reader_shared.cond.notify_all();
                }
                reader_shared.capture.lock().closed = true;
                reader_shared.cond.notify_all();
            });
        let reader = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        };

        Ok(Self {
            program,
            child,
            shared,
            reader: Some(reader),
            terminated: false,
        })
    }

    pub(crate) fn sample_count(&self) -> usize {
        self.shared.capture.lock().samples
    }

    /// Block until at least `target` samples have been read.
    pub(crate) fn wait_for_samples(&self, target: usize, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut capture = self.shared.capture.lock();
        while capture.samples < target {
            if capture.closed {
                return Err(BenchError::SamplerExited {
                    program: self.program.clone(),
                });
            }
            if self.shared.cond.wait_until(&mut capture, deadline).timed_out()
                && capture.samples < target
            {
                return Err(BenchError::SamplerTimeout {
                    program: self.program.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Kill the process and hand back every line it printed.
    pub(crate) fn terminate(&mut self) -> Result<Vec<String>> {
        if !self.terminated {
            self.terminated = true;
            match self.child.kill() {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
                Err(e) => return Err(e.into()),
            }
            self.child.wait()?;
            if let Some(reader) = self.reader.take() {
                if reader.join().is_err() {
                    tracing::warn!("reader thread for `{}` panicked", self.program);
                }
            }
        }
        Ok(std::mem::take(&mut self.shared.capture.lock().lines))
    }
}

impl Drop for SampledProcess {
    fn drop(&mut self) {
        if !self.terminated {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
