use sha2::{Digest, Sha256};

use crate::cache::CacheService;

// Tokens are never stored verbatim as keys
fn session_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("session:{:x}", hasher.finalize())
}

impl CacheService {
    /// Remember which user a verified session token belongs to.
    pub async fn cache_session(&self, token: &str, user_id: i32) {
        self.set_json(&session_key(token), &user_id, self.ttl_seconds()).await;
    }

    pub async fn get_cached_session(&self, token: &str) -> Option<i32> {
        self.get_json(&session_key(token)).await
    }
}
