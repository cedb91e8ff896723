//! Host process termination notification.
//!
//! On Unix the runner reacts to `SIGINT`, `SIGTERM` and `SIGQUIT`, the
//! signals a CI supervisor delivers when a job is cancelled. Elsewhere only
//! ctrl-c is available.

/// Completes when the process receives a termination signal.
///
/// Each call installs independent listeners; the caller decides what a
/// delivered signal means.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Completes when the process receives a termination signal.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
