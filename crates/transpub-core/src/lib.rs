pub mod config;
pub mod error;
pub mod host;
pub mod locale;
pub mod outcome;
pub mod repo;
pub mod session;
pub mod translation;

// Re-export common types
pub use error::{Result, TranspubError};
pub use host::{FileUpdate, GitHost, HostError, HostResult, PullRequestDraft};
pub use locale::LocaleId;
pub use outcome::{PublishFailure, PublishOutcome, PublishResult, PublishStep};
pub use repo::RepoRef;
pub use session::{AccessToken, Session, SessionProvider, StaticSessionProvider};
pub use translation::TranslationSet;
