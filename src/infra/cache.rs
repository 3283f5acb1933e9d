//! Redis cache implementation.
//!
//! Optional infrastructure: connected at startup when `USE_CACHE` is set and
//! probed by the health endpoint.

use redis::{aio::ConnectionManager, AsyncCommands, Client};

use crate::config::{Config, CACHE_HEALTH_KEY};
use crate::errors::AppResult;

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis using `REDIS_URL`.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// Round-trip check used by the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        self.exists(CACHE_HEALTH_KEY).await?;
        Ok(())
    }
}
