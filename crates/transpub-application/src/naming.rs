//! Names and texts of the commits, branches and pull requests a publish creates.

use chrono::{DateTime, Utc};
use transpub_core::host::PullRequestDraft;
use transpub_core::locale::LocaleId;
use transpub_core::repo::RepoRef;

/// Contribution branch for `locale`, unique per millisecond so repeated
/// publishes of the same locale never collide.
pub fn branch_name(locale: &LocaleId, at: DateTime<Utc>) -> String {
    format!("update-{}-translations-{}", locale, at.timestamp_millis())
}

pub fn commit_message(locale: &LocaleId) -> String {
    format!("feat: updated {} translation", locale)
}

/// Pull request proposing `branch` of `fork` into `base` upstream.
pub fn pull_request_draft(
    locale: &LocaleId,
    fork: &RepoRef,
    branch: &str,
    base: &str,
) -> PullRequestDraft {
    PullRequestDraft {
        title: format!("Update {} translations", locale),
        body: format!("This PR updates the translations for {}.", locale),
        head: format!("{}:{}", fork.owner, branch),
        base: base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fr() -> LocaleId {
        LocaleId::parse("fr").unwrap()
    }

    #[test]
    fn test_branch_name_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            branch_name(&LocaleId::parse("zh-cn").unwrap(), at),
            "update-zh-cn-translations-1700000000123"
        );
    }

    #[test]
    fn test_branch_names_differ_over_time() {
        let first = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let later = first + Duration::milliseconds(1);
        assert_ne!(branch_name(&fr(), first), branch_name(&fr(), later));
    }

    #[test]
    fn test_pull_request_draft() {
        let draft = pull_request_draft(
            &fr(),
            &RepoRef::new("octocat", "translations"),
            "update-fr-translations-1",
            "main",
        );
        assert_eq!(draft.title, "Update fr translations");
        assert_eq!(draft.body, "This PR updates the translations for fr.");
        assert_eq!(draft.head, "octocat:update-fr-translations-1");
        assert_eq!(draft.base, "main");
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(commit_message(&fr()), "feat: updated fr translation");
    }
}
