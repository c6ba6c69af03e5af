//! Wire types for the GitHub REST API. Only the fields transpub reads are modelled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryResponse {
    /// Absent for anonymous requests.
    #[serde(default)]
    pub permissions: Option<RepositoryPermissions>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPermissions {
    #[serde(default)]
    pub push: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForkResponse {
    pub name: String,
    pub owner: OwnerResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerResponse {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefResponse {
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefObject {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestResponse {
    pub html_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MergeUpstreamRequest<'a> {
    pub branch: &'a str,
}
