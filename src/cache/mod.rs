use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::redis_client::RedisClient;

pub mod auth;
pub mod catalog;

/// Thin JSON-over-Redis cache. Every failure is logged and reported as a miss,
/// callers always fall back to the database.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = match conn.get(key).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Cache read failed for {}: {:?}", key, e);
                return None;
            }
        };

        let value: Option<T> = serde_json::from_str(&data?)
            .map_err(|e| warn!("Cache entry {} is not valid JSON: {:?}", key, e))
            .ok();
        if value.is_some() {
            debug!("Cache hit: {}", key);
        }
        value
    }

    async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize cache entry {}: {:?}", key, e);
                return;
            }
        };

        let mut conn = self.redis.conn.clone();
        let result: Result<(), redis::RedisError> = conn.set_ex(key, data, ttl_seconds).await;
        if let Err(e) = result {
            warn!("Cache write failed for {}: {:?}", key, e);
        }
    }

    async fn invalidate(&self, key: &str) {
        let mut conn = self.redis.conn.clone();
        let result: Result<(), redis::RedisError> = conn.del(key).await;
        if let Err(e) = result {
            warn!("Cache invalidation failed for {}: {:?}", key, e);
        }
    }
}
