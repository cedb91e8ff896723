use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::error::RunnerError;
use crate::spec::RunSpec;

/// Seam between the orchestration flow and the host process table.
///
/// The orchestrator and the cleanup coordinator both go through this trait,
/// so tests can substitute a recording executor and cover every lifecycle
/// path without a container runtime on the host.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Runs the invocation to completion and suspends the caller until the
    /// process terminates. When `quiet` is set the child's stdout/stderr
    /// are suppressed instead of forwarded to the host streams.
    async fn execute(&self, spec: &RunSpec, quiet: bool) -> Result<(), RunnerError>;
}

/// Executor backed by the host's process table.
#[derive(Debug, Default, Clone)]
pub struct HostExecutor;

#[async_trait]
impl ProcessExecutor for HostExecutor {
    async fn execute(&self, spec: &RunSpec, quiet: bool) -> Result<(), RunnerError> {
        trace!(program = %spec.program, args = ?spec.args, "spawn");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        command.stdin(Stdio::null());
        if quiet {
            command.stdout(Stdio::null());
            command.stderr(Stdio::null());
        } else {
            command.stdout(Stdio::inherit());
            command.stderr(Stdio::inherit());
        }

        let mut child = command.spawn().map_err(|source| RunnerError::Process {
            program: spec.program.clone(),
            source,
        })?;

        let status = child.wait().await.map_err(|source| RunnerError::Process {
            program: spec.program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(RunnerError::ExecutionFailed { status });
        }

        Ok(())
    }
}
