use chrono::{DateTime, Utc};
use sqlx::Row;

use callcenter_core::domain::conversation::Role;

use super::{HistoryRepository, RepositoryError, StoredMessage};
use crate::DbPool;

pub struct SqlHistoryRepository {
    pool: DbPool,
}

impl SqlHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<StoredMessage, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let user_id: String =
        row.try_get("user_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let role_str: String =
        row.try_get("role").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let message: String =
        row.try_get("message").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let role = Role::parse(&role_str)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown role `{role_str}`")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("created_at: {e}")))?;

    Ok(StoredMessage { id, user_id, role, message, created_at })
}

#[async_trait::async_trait]
impl HistoryRepository for SqlHistoryRepository {
    async fn append(
        &self,
        user_id: &str,
        role: Role,
        message: &str,
    ) -> Result<StoredMessage, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO chat_messages (user_id, role, message, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(role.as_str())
        .bind(message)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(StoredMessage {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            role,
            message: message.to_string(),
            created_at,
        })
    }

    async fn list(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        // LIMIT -1 is unbounded in SQLite.
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query(
            "SELECT id, user_id, role, message, created_at FROM (
                 SELECT id, user_id, role, message, created_at
                 FROM chat_messages WHERE user_id = ?
                 ORDER BY id DESC LIMIT ?
             ) ORDER BY id ASC",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }

    async fn clear(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
