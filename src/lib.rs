//! # unity-test-runner
//!
//! Launches a single ephemeral Docker container that executes the Unity
//! test toolchain against a mounted workspace, and guarantees the container
//! is force-removed afterward no matter how the run ends: normal
//! completion, a failing build, or the host process being torn down by a
//! cancellation signal.
//!
//! ## Architecture
//!
//! | Part                   | Responsibility                                                |
//! |------------------------|---------------------------------------------------------------|
//! | [`BuildParameters`]    | Immutable caller input for one invocation                     |
//! | [`build_run_spec`]     | Platform-specific `docker run` argv (inert [`RunSpec`] data)  |
//! | [`ContainerRegistry`]  | The `container_id` file the runtime populates at start        |
//! | [`ProcessExecutor`]    | Executes an invocation; trait seam for test substitution      |
//! | [`CleanupCoordinator`] | Exactly-once forced removal across all exit paths             |
//! | [`ContainerRunner`]    | Orchestrates the above for one run                            |
//!
//! The crate emits [`tracing`] events and installs no subscriber; hook up
//! `tracing-subscriber` (or any other collector) in the binary that embeds
//! the runner.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use unity_test_runner::{BuildParameters, ContainerRunner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), unity_test_runner::RunnerError> {
//!     let parameters = BuildParameters {
//!         editor_version: "2021.3.1f1".to_string(),
//!         workspace: PathBuf::from("/home/runner/work/project"),
//!         action_folder: PathBuf::from("/home/runner/action"),
//!         project_path: "my-game".to_string(),
//!         custom_parameters: String::new(),
//!         test_mode: "all".to_string(),
//!         coverage_options: String::new(),
//!         artifacts_path: "artifacts".to_string(),
//!         use_host_network: false,
//!         ssh_agent: None,
//!         git_private_token: None,
//!         github_token: None,
//!         runner_temp_path: PathBuf::from("/tmp/unity-run"),
//!         chown_files_to: None,
//!     };
//!
//!     ContainerRunner::new()
//!         .run("unityci/editor:2021.3.1f1-base-1", &parameters, false)
//!         .await
//! }
//! ```

mod cleanup;
mod error;
mod exec;
mod params;
mod platform;
mod registry;
mod run;
mod signals;
mod spec;

pub use cleanup::CleanupCoordinator;
pub use error::RunnerError;
pub use exec::{HostExecutor, ProcessExecutor};
pub use params::BuildParameters;
pub use platform::Platform;
pub use registry::ContainerRegistry;
pub use run::ContainerRunner;
pub use spec::{build_run_spec, RunSpec, GITHUB_WORKSPACE};
