use std::env;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cleanup::CleanupCoordinator;
use crate::error::RunnerError;
use crate::exec::{HostExecutor, ProcessExecutor};
use crate::params::BuildParameters;
use crate::registry::ContainerRegistry;
use crate::signals;
use crate::spec::build_run_spec;

/// Drives one container run end to end.
///
/// Composes the run-spec builder, the registry, the executor and the
/// cleanup coordinator: build the invocation, register the exit-time
/// trigger, execute, and clean up on every path. Dependencies are injected so tests can swap the
/// executor for a stub.
pub struct ContainerRunner {
    executor: Arc<dyn ProcessExecutor>,
    platform_tag: String,
}

impl ContainerRunner {
    /// Runner backed by the host Docker CLI.
    pub fn new() -> Self {
        Self::with_executor(Arc::new(HostExecutor))
    }

    /// Runner with a substituted executor.
    pub fn with_executor(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            executor,
            platform_tag: env::consts::OS.to_string(),
        }
    }

    /// Overrides the detected host platform tag.
    pub fn with_platform_tag(mut self, tag: impl Into<String>) -> Self {
        self.platform_tag = tag.into();
        self
    }

    /// Launches the build container and waits for it to finish.
    ///
    /// The container is force-removed on every exit path: normal
    /// completion, execution failure, and a termination signal delivered
    /// while the run is in flight. A failed run is surfaced after cleanup
    /// completes; cleanup's own problems are logged, never returned.
    pub async fn run(
        &self,
        image: &str,
        parameters: &BuildParameters,
        quiet: bool,
    ) -> Result<(), RunnerError> {
        parameters
            .validate()
            .map_err(|err| RunnerError::InvalidParameters {
                message: err.to_string(),
            })?;

        let registry = ContainerRegistry::new(&parameters.runner_temp_path);
        let spec = build_run_spec(&self.platform_tag, image, parameters, &registry)?;
        registry.reset()?;

        let cleanup = Arc::new(CleanupCoordinator::new(registry, Arc::clone(&self.executor)));

        // Shares the idempotent release path with the normal return below,
        // so a cancellation mid-run still removes the container.
        let listener = tokio::spawn({
            let cleanup = Arc::clone(&cleanup);
            async move {
                match signals::wait_for_termination().await {
                    Ok(()) => {
                        warn!("termination signal received; removing container");
                        cleanup.remove().await;
                    }
                    Err(err) => warn!(error = %err, "termination listener unavailable"),
                }
            }
        });

        info!(image, quiet, "starting build container");
        let outcome = self.executor.execute(&spec, quiet).await;

        cleanup.remove().await;
        listener.abort();

        match &outcome {
            Ok(()) => info!(image, "build container finished"),
            Err(err) => warn!(image, error = %err, "build container failed"),
        }
        outcome
    }
}

impl Default for ContainerRunner {
    fn default() -> Self {
        Self::new()
    }
}
