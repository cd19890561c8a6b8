use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use callcenter_core::domain::conversation::Role;

use super::{HistoryRepository, RepositoryError, StoredMessage};

#[derive(Default)]
pub struct InMemoryHistoryRepository {
    lines: RwLock<HashMap<String, Vec<StoredMessage>>>,
    next_id: RwLock<i64>,
}

#[async_trait::async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(
        &self,
        user_id: &str,
        role: Role,
        message: &str,
    ) -> Result<StoredMessage, RepositoryError> {
        let mut lines = self.lines.write().await;
        let mut next_id = self.next_id.write().await;
        *next_id += 1;

        let stored = StoredMessage {
            id: *next_id,
            user_id: user_id.to_string(),
            role,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        lines.entry(user_id.to_string()).or_default().push(stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let lines = self.lines.read().await;
        let Some(history) = lines.get(user_id) else {
            return Ok(Vec::new());
        };
        let skip = match limit {
            Some(limit) => history.len().saturating_sub(limit as usize),
            None => 0,
        };
        Ok(history[skip..].to_vec())
    }

    async fn clear(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let removed = self.lines.write().await.remove(user_id);
        Ok(removed.map(|history| history.len() as u64).unwrap_or(0))
    }
}
