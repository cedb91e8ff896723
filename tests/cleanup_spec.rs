use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use unity_test_runner::{
    CleanupCoordinator, ContainerRegistry, ProcessExecutor, RunSpec, RunnerError,
};

fn non_zero_status() -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(256)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(1)
    }
}

/// Counts removal attempts; optionally fails each one.
struct CountingExecutor {
    removals: AtomicUsize,
    fail: bool,
}

impl CountingExecutor {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            removals: AtomicUsize::new(0),
            fail,
        })
    }

    fn removal_count(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessExecutor for CountingExecutor {
    async fn execute(&self, spec: &RunSpec, _quiet: bool) -> Result<(), RunnerError> {
        assert_eq!(spec.args.first().map(String::as_str), Some("rm"));
        self.removals.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RunnerError::ExecutionFailed {
                status: non_zero_status(),
            });
        }
        Ok(())
    }
}

fn coordinator_with_handle(
    temp: &tempfile::TempDir,
    executor: &Arc<CountingExecutor>,
) -> CleanupCoordinator {
    let registry = ContainerRegistry::new(temp.path());
    std::fs::write(registry.cid_path(), "4f5e6d7c8b9a\n").unwrap();
    CleanupCoordinator::new(registry, Arc::clone(executor) as Arc<dyn ProcessExecutor>)
}

#[tokio::test]
async fn second_request_is_a_no_op() {
    let temp = tempfile::tempdir().unwrap();
    let executor = CountingExecutor::new(false);
    let cleanup = coordinator_with_handle(&temp, &executor);

    cleanup.remove().await;
    cleanup.remove().await;

    assert_eq!(executor.removal_count(), 1);
}

#[tokio::test]
async fn racing_triggers_remove_exactly_once() {
    // A termination notification may fire while the normal completion path
    // is already removing; neither order produces a second attempt.
    let temp = tempfile::tempdir().unwrap();
    let executor = CountingExecutor::new(false);
    let cleanup = Arc::new(coordinator_with_handle(&temp, &executor));

    let termination_trigger = tokio::spawn({
        let cleanup = Arc::clone(&cleanup);
        async move { cleanup.remove().await }
    });
    cleanup.remove().await;
    termination_trigger.await.unwrap();

    assert_eq!(executor.removal_count(), 1);
}

#[tokio::test]
async fn missing_handle_file_is_tolerated() {
    let temp = tempfile::tempdir().unwrap();
    let executor = CountingExecutor::new(false);
    let cleanup = CleanupCoordinator::new(
        ContainerRegistry::new(temp.path()),
        Arc::clone(&executor) as Arc<dyn ProcessExecutor>,
    );

    cleanup.remove().await;

    assert_eq!(executor.removal_count(), 0);
}

#[tokio::test]
async fn empty_handle_file_is_tolerated() {
    let temp = tempfile::tempdir().unwrap();
    let executor = CountingExecutor::new(false);
    let registry = ContainerRegistry::new(temp.path());
    std::fs::write(registry.cid_path(), "").unwrap();
    let cleanup =
        CleanupCoordinator::new(registry, Arc::clone(&executor) as Arc<dyn ProcessExecutor>);

    cleanup.remove().await;

    assert_eq!(executor.removal_count(), 0);
}

#[tokio::test]
async fn failed_removal_is_swallowed_and_not_retried() {
    let temp = tempfile::tempdir().unwrap();
    let executor = CountingExecutor::new(true);
    let cleanup = coordinator_with_handle(&temp, &executor);

    cleanup.remove().await;
    cleanup.remove().await;

    assert_eq!(executor.removal_count(), 1);
}
