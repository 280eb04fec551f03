//! Redis key-value store, the async key-value tier.

use async_trait::async_trait;
use redis::AsyncCommands;

use tutorias_core::kv::{KeyValueStore, Result, StoreError};

/// Prefix applied to every key so the tables share a Redis database safely.
const KEY_PREFIX: &str = "tutorias:";

/// Maps Redis errors to StoreError.
pub fn map_redis_error(err: redis::RedisError) -> StoreError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        StoreError::ConnectionFailed(err.to_string())
    } else {
        StoreError::OperationFailed(err.to_string())
    }
}

/// Redis store using a connection manager for reconnects.
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn prefixed(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(prefixed(key)).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(prefixed(key), value)
            .await
            .map_err(map_redis_error)
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(prefixed(key))
            .await
            .map_err(map_redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[test]
    fn test_keys_are_prefixed() {
        assert_eq!(prefixed("users"), "tutorias:users");
    }

    #[tokio::test]
    async fn test_invalid_url_is_connection_failure() {
        let result = RedisStore::new("not a url").await;
        assert!(matches!(result, Err(StoreError::ConnectionFailed(_))));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_set_get_remove() {
        let store = RedisStore::new(&redis_url()).await.unwrap();

        store.set_item("test_kv", "[]").await.unwrap();
        assert_eq!(store.get_item("test_kv").await.unwrap().as_deref(), Some("[]"));

        store.remove_item("test_kv").await.unwrap();
        assert_eq!(store.get_item("test_kv").await.unwrap(), None);
    }
}
