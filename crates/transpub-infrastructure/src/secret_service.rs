//! Session provider backed by `secret.json` and the environment.
//!
//! Priority: secret.json > `GITHUB_TOKEN` > `GH_TOKEN`.

use crate::paths::{ServiceType, TranspubPaths};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use transpub_core::config::SecretConfig;
use transpub_core::session::{AccessToken, Session, SessionProvider};

/// Environment variables consulted when secret.json has no token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Reads the caller's GitHub token on every call, so a token written or
/// revoked between publishes is picked up.
#[derive(Debug, Clone)]
pub struct SecretSessionProvider {
    secret_path: Option<PathBuf>,
}

impl SecretSessionProvider {
    /// Uses the default secret.json location. A missing config directory
    /// only disables the file source; the environment is still consulted.
    pub fn new_default() -> Self {
        let secret_path = TranspubPaths::new(None)
            .get_path(ServiceType::Secret)
            .map_err(|e| tracing::debug!("[SecretSessionProvider] {}", e))
            .ok();
        Self { secret_path }
    }

    /// Uses the secret.json that sits in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let secret_path = TranspubPaths::new(Some(dir))
            .get_path(ServiceType::Secret)
            .ok();
        Self { secret_path }
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            secret_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Loads secret.json, treating a missing or malformed file as empty.
    pub async fn load_secrets(&self) -> Option<SecretConfig> {
        let path = self.secret_path.as_ref()?;
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(
                    "[SecretSessionProvider] No secrets at {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    "[SecretSessionProvider] Ignoring malformed {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Picks the token from secrets first, then from `env` in [`TOKEN_ENV_VARS`] order.
pub fn resolve_token(
    secrets: Option<&SecretConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<AccessToken> {
    let from_secrets = secrets
        .and_then(|s| s.github.as_ref())
        .and_then(|g| g.access_token.clone())
        .and_then(AccessToken::new);

    if from_secrets.is_some() {
        tracing::debug!("[SecretSessionProvider] Using token from secret.json");
        return from_secrets;
    }

    TOKEN_ENV_VARS.iter().find_map(|name| {
        let token = env(name).and_then(AccessToken::new)?;
        tracing::debug!("[SecretSessionProvider] Using token from {}", name);
        Some(token)
    })
}

#[async_trait]
impl SessionProvider for SecretSessionProvider {
    async fn current_session(&self) -> Option<Session> {
        let secrets = self.load_secrets().await;
        let token = resolve_token(secrets.as_ref(), |name| std::env::var(name).ok())?;
        Some(Session::new(Some(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transpub_core::config::GitHubSecret;

    fn secrets_with(token: Option<&str>) -> SecretConfig {
        SecretConfig {
            github: Some(GitHubSecret {
                access_token: token.map(str::to_string),
            }),
        }
    }

    #[test]
    fn test_secret_file_wins_over_env() {
        let secrets = secrets_with(Some("from-file"));
        let token = resolve_token(Some(&secrets), |_| Some("from-env".to_string())).unwrap();
        assert_eq!(token.expose(), "from-file");
    }

    #[test]
    fn test_env_order() {
        let token = resolve_token(None, |name| match name {
            "GH_TOKEN" => Some("gh".to_string()),
            "GITHUB_TOKEN" => Some("github".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(token.expose(), "github");

        let token = resolve_token(None, |name| {
            (name == "GH_TOKEN").then(|| "gh".to_string())
        })
        .unwrap();
        assert_eq!(token.expose(), "gh");
    }

    #[test]
    fn test_blank_secret_falls_back_to_env() {
        let secrets = secrets_with(Some("  "));
        let token = resolve_token(Some(&secrets), |name| {
            (name == "GITHUB_TOKEN").then(|| "github".to_string())
        })
        .unwrap();
        assert_eq!(token.expose(), "github");
    }

    #[test]
    fn test_nothing_configured() {
        assert!(resolve_token(Some(&secrets_with(None)), |_| None).is_none());
        assert!(resolve_token(None, |_| None).is_none());
    }

    #[tokio::test]
    async fn test_load_secrets_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        std::fs::write(&path, r#"{"github": {"access_token": "ghp_file"}}"#).unwrap();

        let provider = SecretSessionProvider::with_path(&path);
        let secrets = provider.load_secrets().await.unwrap();
        let token = resolve_token(Some(&secrets), |_| None).unwrap();
        assert_eq!(token.expose(), "ghp_file");
    }

    #[tokio::test]
    async fn test_malformed_or_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SecretSessionProvider::with_path(dir.path().join("secret.json"));
        assert!(missing.load_secrets().await.is_none());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let broken = SecretSessionProvider::with_path(&path);
        assert!(broken.load_secrets().await.is_none());
    }
}
