//! TranslationPublisher - publishes a locale's translations to the shared repository.
//!
//! Callers with push access get a direct commit on the base branch. Everyone
//! else contributes through their fork: sync or create the fork, branch off
//! its base branch, write the file there and open a pull request upstream.

use crate::naming::{branch_name, commit_message, pull_request_draft};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use transpub_core::config::{ForkWait, RootConfig, UpstreamConfig};
use transpub_core::host::{FileUpdate, GitHost};
use transpub_core::locale::LocaleId;
use transpub_core::outcome::{AtStep, PublishFailure, PublishOutcome, PublishStep};
use transpub_core::repo::RepoRef;
use transpub_core::session::{AccessToken, SessionProvider};
use transpub_core::translation::TranslationSet;

/// Everything a publish needs besides the remote services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherSettings {
    pub upstream: UpstreamConfig,
    /// Base URL of the hosting service's web UI, for links in results.
    pub web_base_url: String,
    pub fork_wait: ForkWait,
}

impl From<&RootConfig> for PublisherSettings {
    fn from(config: &RootConfig) -> Self {
        Self {
            upstream: config.upstream.clone(),
            web_base_url: config.github.web_base_url.clone(),
            fork_wait: config.fork_wait,
        }
    }
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self::from(&RootConfig::default())
    }
}

/// A file write on a specific repository and branch.
struct FileTarget<'a> {
    repo: &'a RepoRef,
    branch: &'a str,
    path: &'a str,
}

type StepResult<T> = Result<T, PublishFailure>;

/// Publishes translation sets on behalf of the session's user.
#[derive(Clone)]
pub struct TranslationPublisher {
    host: Arc<dyn GitHost>,
    sessions: Arc<dyn SessionProvider>,
    settings: PublisherSettings,
}

impl TranslationPublisher {
    pub fn new(
        host: Arc<dyn GitHost>,
        sessions: Arc<dyn SessionProvider>,
        settings: PublisherSettings,
    ) -> Self {
        Self {
            host,
            sessions,
            settings,
        }
    }

    /// Publishes `translations` as the file of `locale`.
    ///
    /// Returns `None` when there is no signed-in session with an access token;
    /// no remote call is made in that case. Every other path returns an
    /// outcome, failures included.
    pub async fn publish(
        &self,
        translations: &TranslationSet,
        locale: &LocaleId,
    ) -> Option<PublishOutcome> {
        let session = self.sessions.current_session().await?;
        let token = session.access_token()?;

        let outcome = match self.publish_as(token, translations, locale).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                tracing::warn!("[Publisher] Publishing {} failed: {}", locale, failure);
                PublishOutcome::Failed(failure)
            }
        };
        Some(outcome)
    }

    async fn publish_as(
        &self,
        token: &AccessToken,
        translations: &TranslationSet,
        locale: &LocaleId,
    ) -> StepResult<PublishOutcome> {
        let upstream = self.settings.upstream.repo();
        let path = self.settings.upstream.file_path(locale);

        let login = self
            .host
            .authenticated_user(token)
            .await
            .at_step(PublishStep::FetchUser)?;

        let can_push = self
            .host
            .can_push(token, &upstream)
            .await
            .at_step(PublishStep::CheckPermissions)?;

        tracing::info!(
            "[Publisher] {} publishing {} to {} ({})",
            login,
            path,
            upstream,
            if can_push { "direct commit" } else { "fork and pull request" }
        );

        if can_push {
            self.commit_directly(token, translations, locale, &upstream, &path)
                .await
        } else {
            self.propose_through_fork(token, translations, locale, &upstream, &path, &login)
                .await
        }
    }

    async fn commit_directly(
        &self,
        token: &AccessToken,
        translations: &TranslationSet,
        locale: &LocaleId,
        upstream: &RepoRef,
        path: &str,
    ) -> StepResult<PublishOutcome> {
        let target = FileTarget {
            repo: upstream,
            branch: &self.settings.upstream.base_branch,
            path,
        };
        self.write_translation_file(token, &target, translations, locale, PublishStep::CommitChanges)
            .await?;

        tracing::info!("[Publisher] Committed {} to {}", path, upstream);
        Ok(PublishOutcome::Committed {
            history_url: self.settings.upstream.history_url(&self.settings.web_base_url),
        })
    }

    async fn propose_through_fork(
        &self,
        token: &AccessToken,
        translations: &TranslationSet,
        locale: &LocaleId,
        upstream: &RepoRef,
        path: &str,
        login: &str,
    ) -> StepResult<PublishOutcome> {
        let base = self.settings.upstream.base_branch.as_str();
        let fork = self.prepare_fork(token, upstream, login).await?;

        let head = self
            .host
            .branch_head(token, &fork, base)
            .await
            .at_step(PublishStep::ResolveBaseRef)?;

        let branch = branch_name(locale, Utc::now());
        self.host
            .create_branch(token, &fork, &branch, &head)
            .await
            .at_step(PublishStep::CreateBranch)?;
        tracing::debug!("[Publisher] Created {} on {} at {}", branch, fork, head);

        let target = FileTarget {
            repo: &fork,
            branch: &branch,
            path,
        };
        self.write_translation_file(token, &target, translations, locale, PublishStep::UpdateFile)
            .await?;

        let draft = pull_request_draft(locale, &fork, &branch, base);
        let html_url = self
            .host
            .open_pull_request(token, upstream, &draft)
            .await
            .at_step(PublishStep::OpenPullRequest)?;

        tracing::info!("[Publisher] Opened pull request {}", html_url);
        Ok(PublishOutcome::PullRequestOpened { html_url })
    }

    /// Finds the caller's fork and syncs it, or requests a new one and waits for it.
    async fn prepare_fork(
        &self,
        token: &AccessToken,
        upstream: &RepoRef,
        login: &str,
    ) -> StepResult<RepoRef> {
        let base = self.settings.upstream.base_branch.as_str();
        let existing = self
            .host
            .list_forks(token, upstream)
            .await
            .at_step(PublishStep::ListForks)?
            .into_iter()
            .find(|fork| fork.owner.eq_ignore_ascii_case(login));

        if let Some(fork) = existing {
            // A stale fork still yields a reviewable pull request.
            if let Err(e) = self.host.sync_fork(token, &fork, base).await {
                tracing::warn!("[Publisher] Failed to sync {} with upstream: {}", fork, e);
            }
            return Ok(fork);
        }

        self.host
            .create_fork(token, upstream)
            .await
            .at_step(PublishStep::CreateFork)?;

        let fork = upstream.fork_for(login);
        tracing::info!("[Publisher] Requested fork {}", fork);
        self.await_fork(token, &fork).await;
        Ok(fork)
    }

    /// Gives the host time to provision a freshly requested fork.
    ///
    /// Never fails: if the fork is still not ready, resolving its base branch
    /// reports the problem.
    async fn await_fork(&self, token: &AccessToken, fork: &RepoRef) {
        match self.settings.fork_wait {
            ForkWait::FixedDelay { secs } => {
                tokio::time::sleep(Duration::from_secs(secs)).await;
            }
            ForkWait::Poll {
                attempts,
                interval_secs,
            } => {
                let base = self.settings.upstream.base_branch.as_str();
                for attempt in 1..=attempts {
                    tokio::time::sleep(Duration::from_secs(interval_secs)).await;
                    match self.host.branch_head(token, fork, base).await {
                        Ok(_) => {
                            tracing::debug!("[Publisher] {} ready after {} probes", fork, attempt);
                            return;
                        }
                        Err(e) => {
                            tracing::debug!("[Publisher] {} not ready ({}): {}", fork, attempt, e);
                        }
                    }
                }
                tracing::warn!(
                    "[Publisher] {} still not ready after {} probes",
                    fork,
                    attempts
                );
            }
        }
    }

    /// Creates or replaces the translations file on `target`.
    ///
    /// The current blob hash is looked up on the target branch itself, so the
    /// host accepts the write as an update of exactly that version.
    async fn write_translation_file(
        &self,
        token: &AccessToken,
        target: &FileTarget<'_>,
        translations: &TranslationSet,
        locale: &LocaleId,
        write_step: PublishStep,
    ) -> StepResult<()> {
        let sha = self
            .host
            .file_sha(token, target.repo, target.path, target.branch)
            .await
            .at_step(PublishStep::FetchFile)?;

        let content = translations
            .encode_file_content()
            .map_err(|e| PublishFailure::ParseFailed {
                step: write_step,
                reason: e.to_string(),
            })?;

        let update = FileUpdate {
            message: commit_message(locale),
            content,
            sha,
            branch: target.branch.to_string(),
        };

        self.host
            .put_file(token, target.repo, target.path, &update)
            .await
            .at_step(write_step)
    }
}
