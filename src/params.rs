use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Caller-supplied input for one container run.
///
/// Field names map one-to-one onto the workflow-context JSON the caller
/// assembles, hence the `camelCase` renaming. The struct is immutable for
/// the duration of an invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParameters {
    /// Editor version baked into the image, exposed as `UNITY_VERSION`.
    pub editor_version: String,
    /// Host checkout mounted as the in-container workspace.
    pub workspace: PathBuf,
    /// Host directory holding the `steps/` resources and entrypoint script.
    pub action_folder: PathBuf,
    /// Project location relative to the workspace root.
    pub project_path: String,
    #[serde(default)]
    pub custom_parameters: String,
    /// Test mode selector; the sentinel `all` expands to every platform.
    pub test_mode: String,
    #[serde(default)]
    pub coverage_options: String,
    pub artifacts_path: String,
    /// Share the host's network namespace instead of an isolated one.
    #[serde(default)]
    pub use_host_network: bool,
    /// Host ssh-agent socket to forward for private-repository access.
    #[serde(default)]
    pub ssh_agent: Option<String>,
    #[serde(default)]
    pub git_private_token: Option<String>,
    /// When present, the run signals success via a side channel and the
    /// container's exit code is not honored.
    #[serde(default)]
    pub github_token: Option<String>,
    /// Host scratch directory; scratch subdirectories and the container id
    /// file live underneath it.
    pub runner_temp_path: PathBuf,
    #[serde(default)]
    pub chown_files_to: Option<String>,
}

impl BuildParameters {
    pub fn validate(&self) -> Result<()> {
        if self.editor_version.trim().is_empty() {
            anyhow::bail!("Editor version cannot be empty");
        }

        if !self.runner_temp_path.is_absolute() {
            anyhow::bail!(
                "Runner temp path '{}' must be absolute",
                self.runner_temp_path.display()
            );
        }

        Ok(())
    }

    /// Expands the test-mode selector into the `TEST_PLATFORMS` value the
    /// entrypoint consumes.
    pub fn test_platforms(&self) -> String {
        if self.test_mode == "all" {
            ["playmode", "editmode", "COMBINE_RESULTS"].join(";")
        } else {
            self.test_mode.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters() -> BuildParameters {
        BuildParameters {
            editor_version: "2021.3.1f1".to_string(),
            workspace: PathBuf::from("/home/runner/work/project"),
            action_folder: PathBuf::from("/home/runner/action"),
            project_path: "test-project".to_string(),
            custom_parameters: String::new(),
            test_mode: "all".to_string(),
            coverage_options: String::new(),
            artifacts_path: "artifacts".to_string(),
            use_host_network: false,
            ssh_agent: None,
            git_private_token: None,
            github_token: None,
            runner_temp_path: PathBuf::from("/tmp/runner"),
            chown_files_to: None,
        }
    }

    #[test]
    fn all_expands_to_every_test_platform() {
        assert_eq!(
            parameters().test_platforms(),
            "playmode;editmode;COMBINE_RESULTS"
        );
    }

    #[test]
    fn single_mode_passes_through_unmodified() {
        let mut params = parameters();
        params.test_mode = "editmode".to_string();
        assert_eq!(params.test_platforms(), "editmode");
    }

    #[test]
    fn validate_rejects_empty_editor_version() {
        let mut params = parameters();
        params.editor_version = "  ".to_string();
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_temp_path() {
        let mut params = parameters();
        params.runner_temp_path = PathBuf::from("relative/temp");
        assert!(params.validate().is_err());
    }

    #[test]
    fn deserializes_from_workflow_context_json() {
        let params: BuildParameters = serde_json::from_value(serde_json::json!({
            "editorVersion": "2021.3.1f1",
            "workspace": "/home/runner/work/project",
            "actionFolder": "/home/runner/action",
            "projectPath": "test-project",
            "testMode": "playmode",
            "artifactsPath": "artifacts",
            "runnerTempPath": "/tmp/runner",
            "sshAgent": "/tmp/ssh-agent.sock",
            "useHostNetwork": true
        }))
        .unwrap();

        assert_eq!(params.editor_version, "2021.3.1f1");
        assert_eq!(params.ssh_agent.as_deref(), Some("/tmp/ssh-agent.sock"));
        assert!(params.use_host_network);
        assert!(params.github_token.is_none());
        assert_eq!(params.custom_parameters, "");
    }
}
