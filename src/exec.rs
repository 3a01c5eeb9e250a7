//! Process execution for the external benchmark tools

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use crate::common::error::{BenchError, Result};

/// What to do when a command exits non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Abort with [`BenchError::CommandFailed`]
    Enforce,
    /// Log a warning and carry on
    Tolerate,
}

/// A command line to run, with optional working directory and stdin file.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    stdin: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs [`CommandSpec`]s with a fixed locale in the child environment.
#[derive(Debug, Clone)]
pub struct Shell {
    locale: String,
}

impl Shell {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    fn command(&self, spec: &CommandSpec) -> Result<Command> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).env("LANG", &self.locale);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        if let Some(path) = &spec.stdin {
            cmd.stdin(Stdio::from(File::open(path)?));
        }
        Ok(cmd)
    }

    fn spawn_error(spec: &CommandSpec, source: std::io::Error) -> BenchError {
        BenchError::Spawn {
            program: spec.program.clone(),
            source,
        }
    }

    /// Run to completion with inherited stdout/stderr.
    pub fn run(&self, spec: &CommandSpec, check: Check) -> Result<()> {
        tracing::debug!(cwd = ?spec.cwd, "run `{}`", spec);
        let status = self
            .command(spec)?
            .status()
            .map_err(|e| Self::spawn_error(spec, e))?;
        if status.success() {
            return Ok(());
        }
        match check {
            Check::Enforce => Err(BenchError::CommandFailed {
                command: spec.to_string(),
                status,
            }),
            Check::Tolerate => {
                tracing::warn!("`{}` exited with {}, continuing", spec, status);
                Ok(())
            }
        }
    }

    /// Run to completion and return stdout; a non-zero exit is always an error.
    pub fn capture(&self, spec: &CommandSpec) -> Result<String> {
        tracing::debug!(cwd = ?spec.cwd, "capture `{}`", spec);
        let output = self
            .command(spec)?
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Self::spawn_error(spec, e))?;
        if !output.status.success() {
            return Err(BenchError::CommandFailed {
                command: spec.to_string(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Start a long-running process with stdout piped back to the caller.
    pub fn spawn_piped(&self, spec: &CommandSpec) -> Result<Child> {
        tracing::debug!(cwd = ?spec.cwd, "spawn `{}`", spec);
        self.command(spec)?
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Self::spawn_error(spec, e))
    }
}
