use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors surfaced by a container run.
///
/// Cleanup-side conditions (`HandleNotFound`, a failed removal) are demoted
/// to diagnostics by the coordinator and never reach the caller; the
/// variants here exist so the registry can report them precisely.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The host platform is neither of the two supported targets.
    #[error("Platform '{platform}' is not supported")]
    UnsupportedPlatform { platform: String },

    /// Caller-supplied parameters failed host-side validation.
    #[error("Invalid build parameters: {message}")]
    InvalidParameters { message: String },

    /// The external process could not be spawned or awaited.
    #[error("Failed to run '{program}': {source}")]
    Process {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The container's process exited non-zero.
    #[error("Container process exited with {status}")]
    ExecutionFailed { status: ExitStatus },

    /// The container id file is absent or empty.
    #[error("Container id file missing at {path}")]
    HandleNotFound { path: PathBuf },

    /// Host-side file or directory preparation failed.
    #[error("Failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunnerError {
    /// Exit code of the failed container process, when one exists.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunnerError::ExecutionFailed { status } => status.code(),
            _ => None,
        }
    }
}
