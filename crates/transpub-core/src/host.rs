//! Git hosting service abstraction.
//!
//! One method per REST endpoint the publisher needs. Implementations decide
//! which HTTP statuses count as success for each endpoint and report
//! everything else as [`HostError::UnexpectedStatus`].

use crate::repo::RepoRef;
use crate::session::AccessToken;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host answered with a status outside the endpoint's success set.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be interpreted.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),
}

impl HostError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Create-or-update request for a single file on a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    /// Commit message.
    pub message: String,
    /// Base64-encoded file content.
    pub content: String,
    /// Blob hash of the file being replaced; absent when creating the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub branch: String,
}

/// Pull request to open against the upstream repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    /// `owner:branch` of the source branch.
    pub head: String,
    /// Target branch on the upstream repository.
    pub base: String,
}

/// The remote operations a publish needs.
#[async_trait]
pub trait GitHost: Send + Sync {
    /// Login of the account owning `token`.
    async fn authenticated_user(&self, token: &AccessToken) -> HostResult<String>;

    /// Whether `token` may push to `repo`.
    async fn can_push(&self, token: &AccessToken, repo: &RepoRef) -> HostResult<bool>;

    /// All forks of `repo`.
    async fn list_forks(&self, token: &AccessToken, repo: &RepoRef) -> HostResult<Vec<RepoRef>>;

    /// Requests a fork of `repo` for the token's owner. Provisioning is asynchronous.
    async fn create_fork(&self, token: &AccessToken, repo: &RepoRef) -> HostResult<()>;

    /// Brings `branch` of `fork` up to date with its upstream.
    async fn sync_fork(&self, token: &AccessToken, fork: &RepoRef, branch: &str)
    -> HostResult<()>;

    /// Commit hash at the head of `branch`.
    async fn branch_head(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        branch: &str,
    ) -> HostResult<String>;

    /// Creates `branch` pointing at `sha`.
    async fn create_branch(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> HostResult<()>;

    /// Blob hash of `path` on `branch`, or `None` when the file does not exist.
    async fn file_sha(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> HostResult<Option<String>>;

    /// Creates or replaces `path` as described by `update`.
    async fn put_file(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        path: &str,
        update: &FileUpdate,
    ) -> HostResult<()>;

    /// Opens a pull request and returns its web URL.
    async fn open_pull_request(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        draft: &PullRequestDraft,
    ) -> HostResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_update_omits_sha_when_creating() {
        let update = FileUpdate {
            message: "feat: updated fr translation".into(),
            content: "e30=".into(),
            sha: None,
            branch: "main".into(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["branch"], "main");
    }

    #[test]
    fn test_file_update_carries_sha_when_replacing() {
        let update = FileUpdate {
            message: "feat: updated fr translation".into(),
            content: "e30=".into(),
            sha: Some("abc123".into()),
            branch: "main".into(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["sha"], "abc123");
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(HostError::UnexpectedStatus { status: 409 }.status(), Some(409));
        assert_eq!(HostError::Parse("eof".into()).status(), None);
    }
}
