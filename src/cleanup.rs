use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::exec::ProcessExecutor;
use crate::registry::ContainerRegistry;
use crate::spec::RunSpec;

/// Guarantees the launched container is force-removed at most once.
///
/// Removal is reachable from three triggers: the executor completing
/// normally, the executor failing, and the host-termination listener firing
/// while the run is still in flight. Whichever arrives first wins the
/// latch; later requests return without touching the runtime, so the
/// triggers need no ordering between them.
pub struct CleanupCoordinator {
    registry: ContainerRegistry,
    executor: Arc<dyn ProcessExecutor>,
    done: AtomicBool,
}

impl CleanupCoordinator {
    pub fn new(registry: ContainerRegistry, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            registry,
            executor,
            done: AtomicBool::new(false),
        }
    }

    /// Force-removes the container and its anonymous volumes.
    ///
    /// Never surfaces a failure to the caller: a missing id file means the
    /// container was never started, and a failed removal usually means the
    /// runtime already reaped it through `--rm`. Both conditions are
    /// logged and swallowed so they cannot mask the run's own outcome.
    pub async fn remove(&self) {
        if self.done.swap(true, Ordering::SeqCst) {
            debug!("cleanup already performed; skipping");
            return;
        }

        let container_id = match self.registry.read_handle() {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "no container to remove");
                return;
            }
        };

        let spec = removal_spec(&container_id);
        match self.executor.execute(&spec, true).await {
            Ok(()) => debug!(container_id = %container_id, "container removed"),
            Err(err) => {
                warn!(container_id = %container_id, error = %err, "container removal failed")
            }
        }
    }
}

fn removal_spec(container_id: &str) -> RunSpec {
    let mut spec = RunSpec::new("docker");
    spec.arg("rm")
        .arg("--force")
        .arg("--volumes")
        .arg(container_id);
    spec
}
