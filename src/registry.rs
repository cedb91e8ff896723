use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::RunnerError;

const CID_FILE_NAME: &str = "container_id";

/// Host-side record of the launched container's identity.
///
/// The registry only derives the well-known path; the container runtime
/// itself writes the id there at start (via the `--cidfile` flag carried in
/// the run spec), and cleanup reads it back exactly once. External tooling
/// inspecting the host can discover the container through the same file.
#[derive(Debug, Clone)]
pub struct ContainerRegistry {
    cid_path: PathBuf,
}

impl ContainerRegistry {
    pub fn new(runner_temp_path: &Path) -> Self {
        Self {
            cid_path: runner_temp_path.join(CID_FILE_NAME),
        }
    }

    /// Path handed to the runtime via `--cidfile`.
    pub fn cid_path(&self) -> &Path {
        &self.cid_path
    }

    /// Clears a stale id file left over from a previous run. The runtime
    /// refuses to start when its cidfile already exists.
    pub fn reset(&self) -> Result<(), RunnerError> {
        match fs::remove_file(&self.cid_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(RunnerError::Io {
                path: self.cid_path.clone(),
                source,
            }),
        }
    }

    /// Reads the runtime-assigned container id.
    ///
    /// An absent or empty file means the container never reached the
    /// started state; both report [`RunnerError::HandleNotFound`].
    pub fn read_handle(&self) -> Result<String, RunnerError> {
        let raw = match fs::read_to_string(&self.cid_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RunnerError::HandleNotFound {
                    path: self.cid_path.clone(),
                })
            }
            Err(source) => {
                return Err(RunnerError::Io {
                    path: self.cid_path.clone(),
                    source,
                })
            }
        };

        let id = raw.trim();
        if id.is_empty() {
            return Err(RunnerError::HandleNotFound {
                path: self.cid_path.clone(),
            });
        }

        Ok(id.to_string())
    }
}
