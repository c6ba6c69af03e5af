//! Time-limited cache of push-permission lookups.
//!
//! Keyed by repository and token fingerprint; uses `tokio::time::Instant`
//! so expiry follows a paused test clock.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use transpub_core::repo::RepoRef;
use transpub_core::session::AccessToken;

/// Key of a cached lookup. The token is stored only as a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    repo: RepoRef,
    token_fingerprint: u64,
}

impl CacheKey {
    fn new(repo: &RepoRef, token: &AccessToken) -> Self {
        let mut hasher = DefaultHasher::new();
        token.expose().hash(&mut hasher);
        Self {
            repo: repo.clone(),
            token_fingerprint: hasher.finish(),
        }
    }
}

/// In-memory cache of push-permission lookups with a fixed time to live.
///
/// Entries are per repository and per token, so two users sharing a client
/// never see each other's permissions. A zero TTL disables caching.
#[derive(Debug, Clone)]
pub struct PermissionCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<CacheKey, (Instant, bool)>>>,
}

impl PermissionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Gets a cached lookup that has not yet expired.
    pub async fn get(&self, repo: &RepoRef, token: &AccessToken) -> Option<bool> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(&CacheKey::new(repo, token))
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, can_push)| *can_push)
    }

    /// Records a lookup, dropping any expired entries on the way.
    pub async fn insert(&self, repo: &RepoRef, token: &AccessToken, can_push: bool) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        entries.insert(CacheKey::new(repo, token), (Instant::now(), can_push));
    }
}
