use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use callcenter_core::domain::conversation::Role;

pub mod history;
pub mod memory;

pub use history::SqlHistoryRepository;
pub use memory::InMemoryHistoryRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// One persisted chat line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredMessage {
    pub id: i64,
    pub user_id: String,
    pub role: Role,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only chat log keyed by customer.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn append(
        &self,
        user_id: &str,
        role: Role,
        message: &str,
    ) -> Result<StoredMessage, RepositoryError>;

    /// Oldest first. With a limit, only the newest `limit` lines are returned.
    async fn list(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, RepositoryError>;

    /// Returns the number of deleted lines.
    async fn clear(&self, user_id: &str) -> Result<u64, RepositoryError>;
}
