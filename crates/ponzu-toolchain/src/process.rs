//! Process launching with inherited stdio.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use ponzu_common::error::{PonzuError, Result};

/// A fully specified external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the directory the child starts in.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the program name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the argument list.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Returns the working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    code: Option<i32>,
}

impl ProcessStatus {
    /// Status of a child that exited with `code`.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a child terminated by a signal.
    #[must_use]
    pub const fn signaled() -> Self {
        Self { code: None }
    }

    /// Returns the exit code, if the child exited normally.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        self.code
    }

    /// Returns whether the child exited with code zero.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Capability to run an external program to completion.
///
/// Implementors must block until the child exits and let it write
/// directly to the caller's stdout and stderr.
pub trait ProcessRunner {
    /// Runs the invocation and returns its exit status.
    ///
    /// # Errors
    ///
    /// Returns [`PonzuError::ProcessLaunch`] if the program cannot be found
    /// or started. A non-zero exit is not an error at this level.
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus> {
        (**self).run(invocation)
    }
}

/// Runs the invocation and turns a non-zero exit into an error.
///
/// # Errors
///
/// Returns [`PonzuError::ProcessLaunch`] if the child cannot start, or
/// [`PonzuError::ProcessExit`] if it exits unsuccessfully.
pub fn run_checked<R: ProcessRunner + ?Sized>(runner: &R, invocation: &Invocation) -> Result<()> {
    let status = runner.run(invocation)?;
    if status.success() {
        return Ok(());
    }
    Err(PonzuError::ProcessExit {
        program: invocation.program().to_string(),
        code: status.code(),
    })
}

/// Runs programs on the host with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a host process runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessStatus> {
        let program = locate(invocation)?;
        tracing::info!(
            program = %program.display(),
            args = ?invocation.arguments(),
            dir = ?invocation.working_dir(),
            "launching process"
        );

        let mut command = Command::new(&program);
        let _ = command.args(invocation.arguments());
        if let Some(dir) = invocation.working_dir() {
            let _ = command.current_dir(dir);
        }

        let status = command.status().map_err(|e| PonzuError::ProcessLaunch {
            program: invocation.program().to_string(),
            source: e,
        })?;
        tracing::debug!(program = invocation.program(), ?status, "process exited");

        Ok(status
            .code()
            .map_or_else(ProcessStatus::signaled, ProcessStatus::from_code))
    }
}

/// Resolves the executable for an invocation.
///
/// Bare names are looked up on `PATH`. Paths with a separator are taken
/// relative to the invocation's working directory.
fn locate(invocation: &Invocation) -> Result<PathBuf> {
    let program = Path::new(invocation.program());
    if program.components().count() > 1 || program.is_absolute() {
        return Ok(match invocation.working_dir() {
            Some(dir) if program.is_relative() => dir.join(program),
            _ => program.to_path_buf(),
        });
    }
    which::which(program).map_err(|e| PonzuError::ProcessLaunch {
        program: invocation.program().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
    })
}
