use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use service_core::error::AppError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::RedisConfig;
use crate::models::VoteRecord;

/// Name of the shared list the worker drains.
pub const VOTES_LIST_KEY: &str = "votes";

/// Append-only sink for vote records.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Append `record` to the tail of the votes list and return the new list
    /// length.
    async fn push_vote(&self, record: &VoteRecord) -> Result<u64, AppError>;
}

/// Redis-backed store. The connection is opened on first use and shared by
/// every request afterwards; the manager reconnects on its own.
pub struct RedisVoteStore {
    client: Client,
    timeout: Duration,
    manager: OnceCell<ConnectionManager>,
}

impl RedisVoteStore {
    /// Validates the URL only. No connection is attempted until the first
    /// vote, so the service can start (and report live) without Redis.
    pub fn new(config: &RedisConfig) -> Result<Self, AppError> {
        let client = Client::open(config.url.clone())?;

        Ok(Self {
            client,
            timeout: config.timeout(),
            manager: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, AppError> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                tracing::info!("Connecting to Redis");
                let manager =
                    with_timeout(self.timeout, self.client.get_connection_manager()).await?;
                tracing::info!("Successfully connected to Redis");
                Ok::<_, AppError>(manager)
            })
            .await?;

        Ok(manager.clone())
    }
}

#[async_trait]
impl VoteStore for RedisVoteStore {
    async fn push_vote(&self, record: &VoteRecord) -> Result<u64, AppError> {
        let payload = record.to_json()?;
        let mut conn = self.connection().await?;

        let len: u64 = with_timeout(
            self.timeout,
            redis::cmd("RPUSH")
                .arg(VOTES_LIST_KEY)
                .arg(&payload)
                .query_async(&mut conn),
        )
        .await?;

        Ok(len)
    }
}

async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::from(redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("Redis did not answer within {:?}", timeout),
        )))),
    }
}

/// In-memory store keeping the exact JSON payloads that would reach Redis.
#[derive(Default)]
pub struct MockVoteStore {
    payloads: std::sync::Mutex<Vec<String>>,
}

impl MockVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }

    pub fn records(&self) -> Vec<VoteRecord> {
        self.payloads()
            .iter()
            .filter_map(|payload| serde_json::from_str(payload).ok())
            .collect()
    }
}

#[async_trait]
impl VoteStore for MockVoteStore {
    async fn push_vote(&self, record: &VoteRecord) -> Result<u64, AppError> {
        let payload = record.to_json()?;
        let mut payloads = self
            .payloads
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock vote store mutex poisoned: {}", e))?;
        payloads.push(payload);
        Ok(payloads.len() as u64)
    }
}
