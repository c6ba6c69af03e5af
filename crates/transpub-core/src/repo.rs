//! References to repositories on the hosting service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An `owner/name` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`, as used in API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The same repository name under another owner, which is how forks are named.
    pub fn fork_for(&self, owner: impl Into<String>) -> Self {
        Self::new(owner, self.name.clone())
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let repo = RepoRef::new("mspaint-cc", "translations");
        assert_eq!(repo.full_name(), "mspaint-cc/translations");
        assert_eq!(repo.to_string(), "mspaint-cc/translations");
    }

    #[test]
    fn test_fork_keeps_repository_name() {
        let upstream = RepoRef::new("mspaint-cc", "translations");
        assert_eq!(
            upstream.fork_for("octocat"),
            RepoRef::new("octocat", "translations")
        );
    }
}
