//! Path management for transpub configuration files.
//!
//! ```text
//! ~/.config/transpub/          # Config directory (platform config dir)
//! ├── config.toml              # Upstream repository and GitHub client settings
//! └── secret.json              # GitHub access token
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Files managed by transpub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
}

impl ServiceType {
    fn file_name(self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::Secret => "secret.json",
        }
    }
}

/// Resolves transpub's files, either under the platform config directory
/// or under an explicit base directory.
#[derive(Debug, Clone, Default)]
pub struct TranspubPaths {
    base_dir: Option<PathBuf>,
}

impl TranspubPaths {
    /// `base_dir` overrides the platform config directory (used by tests and the
    /// directory of a `--config` file).
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the transpub configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("transpub"))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(service.file_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_override() {
        let paths = TranspubPaths::new(Some(Path::new("/tmp/transpub-test")));
        assert_eq!(
            paths.get_path(ServiceType::Config).unwrap(),
            PathBuf::from("/tmp/transpub-test/config.toml")
        );
        assert_eq!(
            paths.get_path(ServiceType::Secret).unwrap(),
            PathBuf::from("/tmp/transpub-test/secret.json")
        );
    }
}
