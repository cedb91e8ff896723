use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RunnerError;
use crate::params::BuildParameters;
use crate::platform::Platform;
use crate::registry::ContainerRegistry;

/// In-container working directory and workspace mount target.
pub const GITHUB_WORKSPACE: &str = "/github/workspace";

const COVERAGE_RESULTS_PATH: &str = "CodeCoverage";
const GITHUB_HOME_DIR: &str = "_github_home";
const GITHUB_WORKFLOW_DIR: &str = "_github_workflow";

const LINUX_SSH_SOCK: &str = "/ssh-agent";
const LINUX_KNOWN_HOSTS: &str = "/home/runner/.ssh/known_hosts";
const WINDOWS_SSH_SOCK: &str = "c:/ssh-agent";
const WINDOWS_KNOWN_HOSTS: &str = "c:/Users/Administrator/.ssh/known_hosts";

/// A fully resolved container invocation: an executable plus its ordered
/// argument list. Inert data until handed to an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl RunSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Declares an environment variable forwarded from the host.
    pub fn env_pass(&mut self, name: &str) -> &mut Self {
        self.arg("--env").arg(name)
    }

    /// Binds an environment variable to an explicit value.
    pub fn env_value(&mut self, name: &str, value: &str) -> &mut Self {
        self.arg("--env").arg(format!("{name}={value}"))
    }

    pub fn volume(&mut self, mapping: String) -> &mut Self {
        self.arg("--volume").arg(mapping)
    }

    /// Renders the invocation for diagnostics. Execution always goes
    /// through the argument list, never through this string.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') || arg.contains('"') || arg.contains('\'') {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Builds the platform-specific `docker run` invocation for one build.
///
/// The only side effect is ensuring the two scratch directories under the
/// runner temp path exist; everything else is pure assembly. Any tag other
/// than the two supported platforms fails before a directory is touched.
pub fn build_run_spec(
    platform_tag: &str,
    image: &str,
    parameters: &BuildParameters,
    registry: &ContainerRegistry,
) -> Result<RunSpec, RunnerError> {
    let platform = Platform::from_tag(platform_tag)?;
    let scratch = ScratchDirs::ensure(&parameters.runner_temp_path)?;

    let spec = match platform {
        Platform::Linux => linux_spec(image, parameters, registry, &scratch),
        Platform::Windows => windows_spec(image, parameters, registry, &scratch),
    };

    debug!(command = %spec.command_line(), "assembled container invocation");
    Ok(spec)
}

/// Host-side scratch directories mounted into the container.
struct ScratchDirs {
    home: PathBuf,
    workflow: PathBuf,
}

impl ScratchDirs {
    fn ensure(runner_temp_path: &Path) -> Result<Self, RunnerError> {
        let home = runner_temp_path.join(GITHUB_HOME_DIR);
        let workflow = runner_temp_path.join(GITHUB_WORKFLOW_DIR);
        for dir in [&home, &workflow] {
            fs::create_dir_all(dir).map_err(|source| RunnerError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { home, workflow })
    }
}

fn linux_spec(
    image: &str,
    parameters: &BuildParameters,
    registry: &ContainerRegistry,
    scratch: &ScratchDirs,
) -> RunSpec {
    let mut spec = RunSpec::new("docker");
    spec.arg("run");
    spec.arg("--workdir").arg(GITHUB_WORKSPACE);
    spec.arg("--cidfile")
        .arg(registry.cid_path().display().to_string());
    spec.arg("--rm");

    push_env_block(&mut spec, parameters, LINUX_SSH_SOCK);

    spec.volume(format!("{}:/root:z", scratch.home.display()));
    spec.volume(format!("{}:/github/workflow:z", scratch.workflow.display()));
    spec.volume(format!(
        "{}:{}:z",
        parameters.workspace.display(),
        GITHUB_WORKSPACE
    ));
    spec.volume(format!(
        "{}/steps:/steps:z",
        parameters.action_folder.display()
    ));
    spec.volume(format!(
        "{}/entrypoint.sh:/entrypoint.sh:z",
        parameters.action_folder.display()
    ));
    if let Some(agent) = &parameters.ssh_agent {
        spec.volume(format!("{agent}:{LINUX_SSH_SOCK}"));
        spec.volume(format!("{LINUX_KNOWN_HOSTS}:/root/.ssh/known_hosts:ro"));
    }

    push_run_mode(&mut spec, parameters);

    spec.arg(image);
    spec.arg("/bin/bash").arg("-c").arg("/entrypoint.sh");
    spec
}

fn windows_spec(
    image: &str,
    parameters: &BuildParameters,
    registry: &ContainerRegistry,
    scratch: &ScratchDirs,
) -> RunSpec {
    let mut spec = RunSpec::new("docker");
    spec.arg("run");
    spec.arg("--workdir").arg(GITHUB_WORKSPACE);
    spec.arg("--cidfile")
        .arg(registry.cid_path().display().to_string());
    spec.arg("--rm");

    push_env_block(&mut spec, parameters, WINDOWS_SSH_SOCK);

    spec.volume(format!("{}:c:/root", scratch.home.display()));
    spec.volume(format!("{}:c:/github/workflow", scratch.workflow.display()));
    spec.volume(format!(
        "{}:c:/github/workspace",
        parameters.workspace.display()
    ));
    spec.volume(format!("{}/steps:c:/steps", parameters.action_folder.display()));
    spec.volume(format!("{}:c:/dist", parameters.action_folder.display()));
    if let Some(agent) = &parameters.ssh_agent {
        spec.volume(format!("{agent}:{WINDOWS_SSH_SOCK}"));
        spec.volume(format!("{WINDOWS_KNOWN_HOSTS}:c:/root/.ssh/known_hosts"));
    }

    push_run_mode(&mut spec, parameters);

    spec.arg(image);
    spec.arg("powershell").arg("c:/dist/entrypoint.ps1");
    spec
}

/// Environment contract shared by both platforms. Only the ssh-agent
/// socket path differs, so it is threaded through.
fn push_env_block(spec: &mut RunSpec, parameters: &BuildParameters, ssh_sock: &str) {
    for name in [
        "UNITY_LICENSE",
        "UNITY_LICENSE_FILE",
        "UNITY_EMAIL",
        "UNITY_PASSWORD",
        "UNITY_SERIAL",
    ] {
        spec.env_pass(name);
    }

    spec.env_value("UNITY_VERSION", &parameters.editor_version);
    spec.env_value("PROJECT_PATH", &parameters.project_path);
    spec.env_value("CUSTOM_PARAMETERS", &parameters.custom_parameters);
    spec.env_value("TEST_PLATFORMS", &parameters.test_platforms());
    spec.env_value("COVERAGE_OPTIONS", &parameters.coverage_options);
    spec.env_value("COVERAGE_RESULTS_PATH", COVERAGE_RESULTS_PATH);
    spec.env_value("ARTIFACTS_PATH", &parameters.artifacts_path);

    for name in [
        "GITHUB_REF",
        "GITHUB_SHA",
        "GITHUB_REPOSITORY",
        "GITHUB_ACTOR",
        "GITHUB_WORKFLOW",
        "GITHUB_HEAD_REF",
        "GITHUB_BASE_REF",
        "GITHUB_EVENT_NAME",
    ] {
        spec.env_pass(name);
    }

    spec.env_value("GITHUB_WORKSPACE", GITHUB_WORKSPACE);

    for name in [
        "GITHUB_ACTION",
        "GITHUB_EVENT_PATH",
        "RUNNER_OS",
        "RUNNER_TOOL_CACHE",
        "RUNNER_TEMP",
        "RUNNER_WORKSPACE",
    ] {
        spec.env_pass(name);
    }

    spec.env_value(
        "GIT_PRIVATE_TOKEN",
        parameters.git_private_token.as_deref().unwrap_or_default(),
    );
    spec.env_value(
        "CHOWN_FILES_TO",
        parameters.chown_files_to.as_deref().unwrap_or_default(),
    );

    if parameters.ssh_agent.is_some() {
        spec.env_value("SSH_AUTH_SOCK", ssh_sock);
    }
}

/// Trailing toggles shared by both platforms: host networking and the
/// exit-code contract. A side-channel token flips `USE_EXIT_CODE` off.
fn push_run_mode(spec: &mut RunSpec, parameters: &BuildParameters) {
    if parameters.use_host_network {
        spec.arg("--net=host");
    }
    let use_exit_code = if parameters.github_token.is_some() {
        "false"
    } else {
        "true"
    };
    spec.env_value("USE_EXIT_CODE", use_exit_code);
}
