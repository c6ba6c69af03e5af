//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so an absent or partial file is valid.

use crate::locale::LocaleId;
use crate::repo::RepoRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RootConfig {
    pub upstream: UpstreamConfig,
    pub github: GitHubConfig,
    pub fork_wait: ForkWait,
}

/// The shared translations repository.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UpstreamConfig {
    pub owner: String,
    pub name: String,
    pub base_branch: String,
    /// Directory holding the locale files, relative to the repository root.
    pub translations_dir: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            owner: "mspaint-cc".to_string(),
            name: "translations".to_string(),
            base_branch: "main".to_string(),
            translations_dir: "translations".to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn repo(&self) -> RepoRef {
        RepoRef::new(&self.owner, &self.name)
    }

    /// Repository path of a locale's file, e.g. `translations/zh/cn.json`.
    pub fn file_path(&self, locale: &LocaleId) -> String {
        let dir = self.translations_dir.trim_matches('/');
        if dir.is_empty() {
            locale.file_path()
        } else {
            format!("{}/{}", dir, locale.file_path())
        }
    }

    /// Web page listing the commits of the base branch.
    pub fn history_url(&self, web_base_url: &str) -> String {
        format!(
            "{}/{}/{}/commits/{}/",
            web_base_url.trim_end_matches('/'),
            self.owner,
            self.name,
            self.base_branch
        )
    }
}

/// Outbound call settings for the GitHub REST API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base_url: String,
    pub web_base_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// How long a permission lookup stays valid. `0` disables caching.
    pub permission_cache_ttl_secs: u64,
    /// Upper bound on pages fetched when searching for the caller's fork.
    pub max_fork_pages: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            web_base_url: "https://github.com".to_string(),
            api_version: "2022-11-28".to_string(),
            user_agent: concat!("transpub/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
            permission_cache_ttl_secs: 60 * 60 * 24,
            max_fork_pages: 10,
        }
    }
}

impl GitHubConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn permission_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.permission_cache_ttl_secs)
    }
}

/// How to wait for a freshly requested fork to be provisioned.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ForkWait {
    /// Sleep once, unconditionally.
    FixedDelay {
        #[serde(default = "default_fork_delay_secs")]
        secs: u64,
    },
    /// Probe the fork's base branch until it answers, at most `attempts` times.
    Poll {
        #[serde(default = "default_poll_attempts")]
        attempts: u32,
        #[serde(default = "default_poll_interval_secs")]
        interval_secs: u64,
    },
}

fn default_fork_delay_secs() -> u64 {
    5
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_poll_interval_secs() -> u64 {
    2
}

impl Default for ForkWait {
    fn default() -> Self {
        Self::FixedDelay {
            secs: default_fork_delay_secs(),
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub github: Option<GitHubSecret>,
}

#[derive(Deserialize, Serialize, Clone, Default)]
pub struct GitHubSecret {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for GitHubSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSecret")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}
