//! Unified error types for the ponzu build workspace.
//!
//! Every pipeline step returns [`PonzuError`] unchanged to its caller; the
//! first error stops the run. Merge conflicts are not errors and never
//! appear here.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum PonzuError {
    /// A filesystem operation (clear, create, copy, walk) failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The working directory does not live under `<workspace>/src`.
    #[error(
        "current working directory {} is not within workspace {}/src",
        working_dir.display(),
        workspace_root.display()
    )]
    NotInWorkspace {
        /// Directory the package identity was resolved from.
        working_dir: PathBuf,
        /// Configured workspace root.
        workspace_root: PathBuf,
    },

    /// An external program could not be found or started.
    #[error("failed to launch {program}: {source}")]
    ProcessLaunch {
        /// Program that failed to start.
        program: String,
        /// Underlying launch error.
        source: std::io::Error,
    },

    /// An external program ran but exited unsuccessfully.
    #[error("{program} exited with {}", exit_description(*code))]
    ProcessExit {
        /// Program that failed.
        program: String,
        /// Exit code, or `None` if the child was terminated by a signal.
        code: Option<i32>,
    },

    /// The project configuration file could not be parsed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Broad category of a [`PonzuError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Copy or clear failures.
    Filesystem,
    /// Invalid configuration or a working directory outside the workspace.
    Configuration,
    /// Executable not found or failed to start.
    ProcessLaunch,
    /// Child exited non-zero.
    ProcessExit,
}

impl PonzuError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Filesystem,
            Self::Config { .. } | Self::NotInWorkspace { .. } | Self::Serialization { .. } => {
                ErrorKind::Configuration
            }
            Self::ProcessLaunch { .. } => ErrorKind::ProcessLaunch,
            Self::ProcessExit { .. } => ErrorKind::ProcessExit,
        }
    }

    /// Shorthand for building an [`PonzuError::Io`] from a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_description(code: Option<i32>) -> String {
    code.map_or_else(
        || "termination by signal".to_string(),
        |c| format!("exit status {c}"),
    )
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PonzuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_in_workspace_message_names_workspace() {
        let err = PonzuError::NotInWorkspace {
            working_dir: PathBuf::from("/tmp/proj"),
            workspace_root: PathBuf::from("/ws"),
        };
        let msg = err.to_string();
        assert!(msg.contains("not within workspace"));
        assert!(msg.contains("/ws/src"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn process_exit_message_includes_code() {
        let err = PonzuError::ProcessExit {
            program: "go".into(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "go exited with exit status 2");
        assert_eq!(err.kind(), ErrorKind::ProcessExit);
    }

    #[test]
    fn process_exit_without_code_reports_signal() {
        let err = PonzuError::ProcessExit {
            program: "docker".into(),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn io_helper_sets_filesystem_kind() {
        let err = PonzuError::io("/vendor", std::io::Error::other("denied"));
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(err.to_string().starts_with("I/O error at /vendor"));
    }
}
