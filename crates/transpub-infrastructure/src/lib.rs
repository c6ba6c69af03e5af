pub mod config_service;
pub mod github;
pub mod paths;
pub mod permission_cache;
pub mod secret_service;

pub use crate::config_service::ConfigService;
pub use crate::github::GitHubClient;
pub use crate::permission_cache::PermissionCache;
pub use crate::secret_service::SecretSessionProvider;
