//! Publish outcomes and the user-facing result envelope.

use crate::host::HostError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote steps of a publish, in the order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishStep {
    FetchUser,
    CheckPermissions,
    ListForks,
    CreateFork,
    ResolveBaseRef,
    CreateBranch,
    FetchFile,
    /// Writing straight to the upstream base branch.
    CommitChanges,
    /// Writing to the contribution branch in a fork.
    UpdateFile,
    OpenPullRequest,
}

impl PublishStep {
    /// Short title shown to the user when this step fails.
    pub fn failure_title(self) -> &'static str {
        match self {
            Self::FetchUser => "Failed to verify account",
            Self::CheckPermissions => "Failed to check permissions",
            Self::ListForks => "Failed to list forks",
            Self::CreateFork => "Failed to fork repository",
            Self::ResolveBaseRef => "Failed to get reference",
            Self::CreateBranch => "Failed to create branch",
            Self::FetchFile => "Failed to fetch file",
            Self::CommitChanges => "Failed to commit changes",
            Self::UpdateFile => "Failed to update file",
            Self::OpenPullRequest => "Failed to create PR",
        }
    }

    /// What the step was doing, phrased to follow "while".
    fn activity(self) -> &'static str {
        match self {
            Self::FetchUser => "looking up your GitHub account",
            Self::CheckPermissions => "checking your repository permissions",
            Self::ListForks => "looking for your fork",
            Self::CreateFork => "forking the repository",
            Self::ResolveBaseRef => "getting the reference to the base branch",
            Self::CreateBranch => "creating a branch for your changes",
            Self::FetchFile => "fetching the translations file",
            Self::CommitChanges => "committing changes to the translations file",
            Self::UpdateFile => "updating the translations file",
            Self::OpenPullRequest => "creating the pull request",
        }
    }

    fn status_description(self, status: u16) -> String {
        match self {
            Self::FetchUser => format!("Failed to look up your GitHub account ({status})."),
            Self::CheckPermissions => {
                format!("Failed to check your permissions on the repository ({status}).")
            }
            Self::ListForks => format!("Failed to list forks of the repository ({status})."),
            Self::CreateFork => format!("Failed to fork the repository ({status})."),
            Self::ResolveBaseRef => {
                format!("Failed to get reference to the base branch ({status}).")
            }
            Self::CreateBranch => format!("Failed to create branch for changes ({status})."),
            Self::FetchFile => format!("Failed to fetch the translations file ({status})."),
            Self::CommitChanges => format!(
                "Had an HTTP error ({status}) while committing changes to the translations file."
            ),
            Self::UpdateFile => format!("Failed to update translations file ({status})."),
            Self::OpenPullRequest => format!("Failed to create pull request ({status})."),
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.activity())
    }
}

/// Terminal failure of a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishFailure {
    /// The step's response status was outside its success set.
    RemoteCallFailed { step: PublishStep, status: u16 },
    /// The step's response body could not be interpreted.
    ParseFailed { step: PublishStep, reason: String },
    /// The step's request never got a response.
    Unreachable { step: PublishStep, reason: String },
}

impl PublishFailure {
    /// Attributes a remote call error to the step that issued it.
    pub fn from_host(step: PublishStep, err: HostError) -> Self {
        match err {
            HostError::UnexpectedStatus { status } => Self::RemoteCallFailed { step, status },
            HostError::Parse(reason) => Self::ParseFailed { step, reason },
            HostError::Transport(reason) => Self::Unreachable { step, reason },
        }
    }

    pub fn step(&self) -> PublishStep {
        match self {
            Self::RemoteCallFailed { step, .. }
            | Self::ParseFailed { step, .. }
            | Self::Unreachable { step, .. } => *step,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteCallFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.step().failure_title()
    }

    pub fn description(&self) -> String {
        let detail = match self {
            Self::RemoteCallFailed { step, status } => step.status_description(*status),
            Self::ParseFailed { step, .. } => match step {
                PublishStep::FetchFile => "Failed to fetch the translations file.".to_string(),
                _ => format!("Could not read GitHub's response while {}.", step),
            },
            Self::Unreachable { step, .. } => {
                format!("Could not reach GitHub while {}.", step)
            }
        };
        format!("{} Please try again later.", detail)
    }
}

impl fmt::Display for PublishFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteCallFailed { step, status } => {
                write!(f, "HTTP {} while {}", status, step)
            }
            Self::ParseFailed { step, reason } => {
                write!(f, "unreadable response while {}: {}", step, reason)
            }
            Self::Unreachable { step, reason } => {
                write!(f, "no response while {}: {}", step, reason)
            }
        }
    }
}

impl std::error::Error for PublishFailure {}

/// Helper for tagging remote call results with their step.
pub trait AtStep<T> {
    fn at_step(self, step: PublishStep) -> Result<T, PublishFailure>;
}

impl<T> AtStep<T> for Result<T, HostError> {
    fn at_step(self, step: PublishStep) -> Result<T, PublishFailure> {
        self.map_err(|err| PublishFailure::from_host(step, err))
    }
}

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The translations were committed directly to the upstream base branch.
    Committed { history_url: String },
    /// The translations were proposed through a pull request.
    PullRequestOpened { html_url: String },
    Failed(PublishFailure),
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Builds the envelope returned to callers.
    pub fn to_result(&self) -> PublishResult {
        match self {
            Self::Committed { history_url } => PublishResult {
                success: true,
                message: ResultMessage {
                    message: "Translations updated!".to_string(),
                    description: "Your translations have been successfully updated.".to_string(),
                    action: Some(ResultAction::open_link("Show changes", history_url)),
                },
            },
            Self::PullRequestOpened { html_url } => PublishResult {
                success: true,
                message: ResultMessage {
                    message: "Your changes are in review!".to_string(),
                    description: "We have created a PR with your translation changes."
                        .to_string(),
                    action: Some(ResultAction::open_link("View PR", html_url)),
                },
            },
            Self::Failed(failure) => PublishResult {
                success: false,
                message: ResultMessage {
                    message: failure.title().to_string(),
                    description: failure.description(),
                    action: None,
                },
            },
        }
    }
}

impl From<PublishFailure> for PublishOutcome {
    fn from(failure: PublishFailure) -> Self {
        Self::Failed(failure)
    }
}

/// `{ success, message: { message, description, action? } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    pub message: ResultMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMessage {
    pub message: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ResultAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAction {
    pub label: String,
    pub on_click: ActionKind,
    pub href: String,
}

impl ResultAction {
    pub fn open_link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_click: ActionKind::OpenLink,
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    OpenLink,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_committed_envelope() {
        let outcome = PublishOutcome::Committed {
            history_url: "https://github.com/mspaint-cc/translations/commits/main/".into(),
        };
        let value = serde_json::to_value(outcome.to_result()).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": {
                    "message": "Translations updated!",
                    "description": "Your translations have been successfully updated.",
                    "action": {
                        "label": "Show changes",
                        "onClick": "OPEN_LINK",
                        "href": "https://github.com/mspaint-cc/translations/commits/main/"
                    }
                }
            })
        );
    }

    #[test]
    fn test_failure_envelope_has_no_action() {
        let outcome = PublishOutcome::from(PublishFailure::RemoteCallFailed {
            step: PublishStep::CreateBranch,
            status: 422,
        });
        let value = serde_json::to_value(outcome.to_result()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"]["message"], "Failed to create branch");
        assert_eq!(
            value["message"]["description"],
            "Failed to create branch for changes (422). Please try again later."
        );
        assert!(value["message"].get("action").is_none());
    }

    #[test]
    fn test_every_status_description_embeds_the_status() {
        let steps = [
            PublishStep::FetchUser,
            PublishStep::CheckPermissions,
            PublishStep::ListForks,
            PublishStep::CreateFork,
            PublishStep::ResolveBaseRef,
            PublishStep::CreateBranch,
            PublishStep::FetchFile,
            PublishStep::CommitChanges,
            PublishStep::UpdateFile,
            PublishStep::OpenPullRequest,
        ];
        for step in steps {
            let failure = PublishFailure::RemoteCallFailed { step, status: 503 };
            assert!(
                failure.description().contains("503"),
                "{:?} lost its status",
                step
            );
        }
    }

    #[test]
    fn test_base_ref_failure_names_no_fixed_branch() {
        let failure = PublishFailure::RemoteCallFailed {
            step: PublishStep::ResolveBaseRef,
            status: 404,
        };
        assert_eq!(
            failure.description(),
            "Failed to get reference to the base branch (404). Please try again later."
        );
        assert!(!PublishStep::ResolveBaseRef.to_string().contains("main"));
    }

    #[test]
    fn test_from_host_maps_each_kind() {
        assert_eq!(
            PublishFailure::from_host(
                PublishStep::CreateFork,
                HostError::UnexpectedStatus { status: 403 }
            ),
            PublishFailure::RemoteCallFailed {
                step: PublishStep::CreateFork,
                status: 403
            }
        );
        assert!(matches!(
            PublishFailure::from_host(PublishStep::FetchFile, HostError::Parse("eof".into())),
            PublishFailure::ParseFailed { .. }
        ));
        assert!(matches!(
            PublishFailure::from_host(PublishStep::FetchUser, HostError::Transport("dns".into())),
            PublishFailure::Unreachable { .. }
        ));
    }

    #[test]
    fn test_unparseable_file_description() {
        let failure = PublishFailure::ParseFailed {
            step: PublishStep::FetchFile,
            reason: "expected value".into(),
        };
        assert_eq!(failure.title(), "Failed to fetch file");
        assert_eq!(
            failure.description(),
            "Failed to fetch the translations file. Please try again later."
        );
    }

    #[test]
    fn test_at_step() {
        let result: Result<(), HostError> = Err(HostError::UnexpectedStatus { status: 500 });
        let failure = result.at_step(PublishStep::OpenPullRequest).unwrap_err();
        assert_eq!(failure.step(), PublishStep::OpenPullRequest);
        assert_eq!(failure.status(), Some(500));
    }
}
