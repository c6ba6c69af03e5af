//! Sessions handed to us by the identity provider.
//!
//! transpub never creates or refreshes credentials. It only reads the access
//! token of whatever session the provider currently holds.

use async_trait::async_trait;
use std::fmt;

/// A GitHub access token.
///
/// `Debug` is redacted so a token cannot leak through logs or panics.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token. Blank tokens are treated as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// An externally managed session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    access_token: Option<AccessToken>,
}

impl Session {
    pub fn new(access_token: Option<AccessToken>) -> Self {
        Self { access_token }
    }

    pub fn with_token(raw: impl Into<String>) -> Self {
        Self::new(AccessToken::new(raw))
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }
}

/// Source of the caller's session.
///
/// `None` means nobody is signed in; callers treat that as "not authenticated"
/// rather than as an error.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> Option<Session>;
}

/// A provider that always hands out the same session (or none).
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn with_token(raw: impl Into<String>) -> Self {
        Self::new(Some(Session::with_token(raw)))
    }

    pub fn signed_out() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_absent() {
        assert!(AccessToken::new("").is_none());
        assert!(AccessToken::new("   ").is_none());
        assert!(Session::with_token("").access_token().is_none());
    }

    #[test]
    fn test_token_is_trimmed() {
        let token = AccessToken::new(" ghp_abc\n").unwrap();
        assert_eq!(token.expose(), "ghp_abc");
    }

    #[test]
    fn test_debug_is_redacted() {
        let session = Session::with_token("ghp_secret");
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("***"));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticSessionProvider::with_token("ghp_abc");
        let session = provider.current_session().await.unwrap();
        assert_eq!(session.access_token().unwrap().expose(), "ghp_abc");

        assert!(
            StaticSessionProvider::signed_out()
                .current_session()
                .await
                .is_none()
        );
    }
}
