//! Native Redis backend (`GET` / `INCR`).
//!
//! The connection manager is created on first use so a Redis outage at boot
//! degrades the counter instead of failing startup.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::sync::OnceCell;

use folio_core::error::{FolioError, Result};

use super::store::CounterStore;

pub struct RedisCounterStore {
    client: Client,
    conn: OnceCell<ConnectionManager>,
    key: String,
}

impl RedisCounterStore {
    pub fn new(redis_url: &str, key: String) -> Result<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| FolioError::Config(format!("invalid redis url: {e}")))?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
            key,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                tracing::info!("connecting to redis");
                self.client.get_connection_manager().await
            })
            .await
            .map_err(|e| FolioError::Store(format!("redis connect failed: {e}")))?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn read(&self) -> Result<u64> {
        let mut conn = self.connection().await?;
        let value: Option<u64> = conn
            .get(self.key.as_str())
            .await
            .map_err(|e| FolioError::Store(format!("GET failed: {e}")))?;
        Ok(value.unwrap_or(0))
    }

    async fn increment(&self) -> Result<u64> {
        let mut conn = self.connection().await?;
        let value: u64 = conn
            .incr(self.key.as_str(), 1u64)
            .await
            .map_err(|e| FolioError::Store(format!("INCR failed: {e}")))?;
        Ok(value)
    }
}
