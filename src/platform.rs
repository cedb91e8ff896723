use crate::error::RunnerError;

/// Host platforms the runner knows how to build an invocation for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    /// Resolves a platform tag as reported by [`std::env::consts::OS`].
    pub fn from_tag(tag: &str) -> Result<Self, RunnerError> {
        match tag {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(RunnerError::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }

    /// The platform this process is running on.
    pub fn current() -> Result<Self, RunnerError> {
        Self::from_tag(std::env::consts::OS)
    }
}
