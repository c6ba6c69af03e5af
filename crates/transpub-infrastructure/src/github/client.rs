//! GitHubClient - REST implementation of [`GitHost`] for api.github.com.

use super::dto::{
    ContentResponse, CreateRefRequest, ForkResponse, MergeUpstreamRequest, PullRequestResponse,
    RefResponse, RepositoryResponse, UserResponse,
};
use crate::permission_cache::PermissionCache;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use transpub_core::config::GitHubConfig;
use transpub_core::host::{FileUpdate, GitHost, HostError, HostResult, PullRequestDraft};
use transpub_core::repo::RepoRef;
use transpub_core::session::AccessToken;

const FORKS_PER_PAGE: usize = 100;

/// GitHub REST client.
///
/// Cheap to clone; clones share the HTTP connection pool and the permission cache.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
    permissions: PermissionCache,
}

impl GitHubClient {
    /// Creates a client whose permission cache follows `config.permission_cache_ttl_secs`.
    pub fn new(config: GitHubConfig) -> Self {
        let permissions = PermissionCache::new(config.permission_cache_ttl());
        Self {
            client: Client::new(),
            config,
            permissions,
        }
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    pub fn permission_cache(&self) -> &PermissionCache {
        &self.permissions
    }

    /// Absolute URL of an API path such as `/repos/o/r/forks`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn repo_endpoint(&self, repo: &RepoRef, rest: &str) -> String {
        let base = format!("repos/{}/{}", repo.owner, repo.name);
        if rest.is_empty() {
            self.endpoint(&base)
        } else {
            self.endpoint(&format!("{}/{}", base, rest.trim_start_matches('/')))
        }
    }

    /// Adds authentication, API version and timeout to a request.
    fn authorized(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request
            .header("Authorization", format!("token {}", token.expose()))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", &self.config.api_version)
            .header("User-Agent", &self.config.user_agent)
            .timeout(self.config.request_timeout())
    }

    async fn send(&self, request: RequestBuilder, token: &AccessToken) -> HostResult<Response> {
        self.authorized(request, token)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))
    }
}

/// Passes the response through when its status is one of `expected`.
fn expect_status(response: Response, expected: &[StatusCode]) -> HostResult<Response> {
    let status = response.status();
    if expected.contains(&status) {
        Ok(response)
    } else {
        tracing::debug!(
            "[GitHubClient] {} answered {} (expected {:?})",
            response.url().path(),
            status,
            expected
        );
        Err(HostError::UnexpectedStatus {
            status: status.as_u16(),
        })
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> HostResult<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| HostError::Transport(format!("Failed to read response body: {}", e)))?;
    serde_json::from_slice(&body).map_err(|e| HostError::Parse(e.to_string()))
}

#[async_trait]
impl GitHost for GitHubClient {
    async fn authenticated_user(&self, token: &AccessToken) -> HostResult<String> {
        tracing::debug!("[GitHubClient] GET /user");
        let response = self.send(self.client.get(self.endpoint("user")), token).await?;
        let user: UserResponse = parse_json(expect_status(response, &[StatusCode::OK])?).await?;
        Ok(user.login)
    }

    async fn can_push(&self, token: &AccessToken, repo: &RepoRef) -> HostResult<bool> {
        if let Some(cached) = self.permissions.get(repo, token).await {
            tracing::debug!("[GitHubClient] Push permission on {} (cached): {}", repo, cached);
            return Ok(cached);
        }

        tracing::debug!("[GitHubClient] GET /repos/{}", repo);
        let response = self
            .send(self.client.get(self.repo_endpoint(repo, "")), token)
            .await?;
        let metadata: RepositoryResponse =
            parse_json(expect_status(response, &[StatusCode::OK])?).await?;
        let can_push = metadata.permissions.is_some_and(|p| p.push);

        self.permissions.insert(repo, token, can_push).await;
        Ok(can_push)
    }

    async fn list_forks(&self, token: &AccessToken, repo: &RepoRef) -> HostResult<Vec<RepoRef>> {
        let mut forks = Vec::new();

        for page in 1..=self.config.max_fork_pages.max(1) {
            tracing::debug!("[GitHubClient] GET /repos/{}/forks page {}", repo, page);
            let request = self
                .client
                .get(self.repo_endpoint(repo, "forks"))
                .query(&[("per_page", FORKS_PER_PAGE.to_string()), ("page", page.to_string())]);
            let response = self.send(request, token).await?;
            let batch: Vec<ForkResponse> =
                parse_json(expect_status(response, &[StatusCode::OK])?).await?;

            let last_page = batch.len() < FORKS_PER_PAGE;
            forks.extend(
                batch
                    .into_iter()
                    .map(|fork| RepoRef::new(fork.owner.login, fork.name)),
            );
            if last_page {
                break;
            }
        }

        Ok(forks)
    }

    async fn create_fork(&self, token: &AccessToken, repo: &RepoRef) -> HostResult<()> {
        tracing::debug!("[GitHubClient] POST /repos/{}/forks", repo);
        let response = self
            .send(self.client.post(self.repo_endpoint(repo, "forks")), token)
            .await?;
        expect_status(response, &[StatusCode::ACCEPTED])?;
        Ok(())
    }

    async fn sync_fork(
        &self,
        token: &AccessToken,
        fork: &RepoRef,
        branch: &str,
    ) -> HostResult<()> {
        tracing::debug!("[GitHubClient] POST /repos/{}/merge-upstream", fork);
        let request = self
            .client
            .post(self.repo_endpoint(fork, "merge-upstream"))
            .json(&MergeUpstreamRequest { branch });
        let response = self.send(request, token).await?;
        expect_status(response, &[StatusCode::OK])?;
        Ok(())
    }

    async fn branch_head(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        branch: &str,
    ) -> HostResult<String> {
        let path = format!("git/refs/heads/{}", branch);
        tracing::debug!("[GitHubClient] GET /repos/{}/{}", repo, path);
        let response = self
            .send(self.client.get(self.repo_endpoint(repo, &path)), token)
            .await?;
        let git_ref: RefResponse = parse_json(expect_status(response, &[StatusCode::OK])?).await?;
        Ok(git_ref.object.sha)
    }

    async fn create_branch(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> HostResult<()> {
        tracing::debug!("[GitHubClient] POST /repos/{}/git/refs ({})", repo, branch);
        let request = self
            .client
            .post(self.repo_endpoint(repo, "git/refs"))
            .json(&CreateRefRequest {
                git_ref: format!("refs/heads/{}", branch),
                sha,
            });
        let response = self.send(request, token).await?;
        expect_status(response, &[StatusCode::CREATED])?;
        Ok(())
    }

    async fn file_sha(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> HostResult<Option<String>> {
        let contents = format!("contents/{}", path.trim_start_matches('/'));
        tracing::debug!("[GitHubClient] GET /repos/{}/{} on {}", repo, contents, branch);
        let request = self
            .client
            .get(self.repo_endpoint(repo, &contents))
            .query(&[("ref", branch)]);
        let response = self.send(request, token).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let file: ContentResponse = parse_json(expect_status(response, &[StatusCode::OK])?).await?;
        Ok(Some(file.sha))
    }

    async fn put_file(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        path: &str,
        update: &FileUpdate,
    ) -> HostResult<()> {
        let contents = format!("contents/{}", path.trim_start_matches('/'));
        tracing::debug!(
            "[GitHubClient] PUT /repos/{}/{} on {} ({})",
            repo,
            contents,
            update.branch,
            if update.sha.is_some() { "update" } else { "create" }
        );
        let request = self
            .client
            .put(self.repo_endpoint(repo, &contents))
            .json(update);
        let response = self.send(request, token).await?;
        expect_status(response, &[StatusCode::OK, StatusCode::CREATED])?;
        Ok(())
    }

    async fn open_pull_request(
        &self,
        token: &AccessToken,
        repo: &RepoRef,
        draft: &PullRequestDraft,
    ) -> HostResult<String> {
        tracing::debug!("[GitHubClient] POST /repos/{}/pulls ({})", repo, draft.head);
        let request = self.client.post(self.repo_endpoint(repo, "pulls")).json(draft);
        let response = self.send(request, token).await?;
        let pull: PullRequestResponse =
            parse_json(expect_status(response, &[StatusCode::CREATED])?).await?;
        Ok(pull.html_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> GitHubClient {
        GitHubClient::new(GitHubConfig::default())
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let custom = GitHubClient::new(GitHubConfig {
            api_base_url: "https://ghe.example.com/api/v3/".to_string(),
            ..GitHubConfig::default()
        });
        assert_eq!(custom.endpoint("/user"), "https://ghe.example.com/api/v3/user");
        assert_eq!(client().endpoint("user"), "https://api.github.com/user");
    }

    #[test]
    fn test_repo_endpoint() {
        let repo = RepoRef::new("mspaint-cc", "translations");
        assert_eq!(
            client().repo_endpoint(&repo, ""),
            "https://api.github.com/repos/mspaint-cc/translations"
        );
        assert_eq!(
            client().repo_endpoint(&repo, "contents/translations/fr.json"),
            "https://api.github.com/repos/mspaint-cc/translations/contents/translations/fr.json"
        );
    }

    #[test]
    fn test_authorized_request_headers() {
        let client = client();
        let token = AccessToken::new("ghp_abc").unwrap();
        let request = client
            .authorized(client.client.get(client.endpoint("user")), &token)
            .build()
            .unwrap();

        let headers = request.headers();
        assert_eq!(headers["Authorization"], "token ghp_abc");
        assert_eq!(headers["Accept"], "application/vnd.github+json");
        assert_eq!(headers["X-GitHub-Api-Version"], "2022-11-28");
        assert!(headers.contains_key("User-Agent"));
        assert_eq!(request.timeout(), Some(&Duration::from_secs(30)));
    }

    #[test]
    fn test_cache_ttl_comes_from_config() {
        let disabled = GitHubClient::new(GitHubConfig {
            permission_cache_ttl_secs: 0,
            ..GitHubConfig::default()
        });
        assert!(!disabled.permission_cache().is_enabled());
        assert!(client().permission_cache().is_enabled());
    }

    #[tokio::test]
    async fn test_cached_permission_skips_network() {
        // Unroutable base URL: any real request would fail with a transport error.
        let client = GitHubClient::new(GitHubConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..GitHubConfig::default()
        });
        let repo = RepoRef::new("mspaint-cc", "translations");
        let token = AccessToken::new("ghp_abc").unwrap();

        client.permission_cache().insert(&repo, &token, true).await;
        assert_eq!(client.can_push(&token, &repo).await, Ok(true));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = GitHubClient::new(GitHubConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            ..GitHubConfig::default()
        });
        let token = AccessToken::new("ghp_abc").unwrap();

        let err = client.authenticated_user(&token).await.unwrap_err();
        assert!(matches!(err, HostError::Transport(_)), "got {err:?}");
    }
}
