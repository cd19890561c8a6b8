use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use callcenter_agent::AgentRuntime;
use callcenter_core::domain::conversation::Role;
use callcenter_core::domain::sentiment::SentimentResult;
use callcenter_db::{HistoryRepository, RepositoryError, StoredMessage};

/// Rating and mood shown next to a conversation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SatisfactionPanel {
    pub rating: Option<u8>,
    pub survey_shown: bool,
    pub sentiment: Option<SentimentResult>,
}

/// Dialogue engine plus the persistent chat log.
#[derive(Clone)]
pub struct ChatService {
    runtime: AgentRuntime,
    history: Arc<dyn HistoryRepository>,
}

impl ChatService {
    pub fn new(runtime: AgentRuntime, history: Arc<dyn HistoryRepository>) -> Self {
        Self { runtime, history }
    }

    /// Logs the message, answers it and logs the reply. Once the turn has run the reply is
    /// returned even if it cannot be stored.
    pub async fn send(&self, user_id: &str, message: &str) -> Result<String, RepositoryError> {
        self.history.append(user_id, Role::User, message).await?;
        let reply = self.runtime.handle_message(user_id, message).await;
        if let Err(error) = self.history.append(user_id, Role::Bot, &reply).await {
            warn!(
                event_name = "cli.history.reply_not_saved",
                user_id,
                error = %error,
                "reply delivered but missing from the chat log"
            );
        }
        Ok(reply)
    }

    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        self.history.list(user_id, limit).await
    }

    /// Forgets the stored log and the survey state. In-session context is kept.
    pub async fn reset(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let removed = self.history.clear(user_id).await?;
        self.runtime.clear_satisfaction_data(user_id).await;
        Ok(removed)
    }

    pub async fn satisfaction(&self, user_id: &str) -> SatisfactionPanel {
        let state = self.runtime.satisfaction_state(user_id).await;
        SatisfactionPanel {
            rating: state.rating.map(|rating| rating.value()),
            survey_shown: state.survey_shown,
            sentiment: self.runtime.get_sentiment_result(user_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use callcenter_agent::{AgentRuntime, FixedSelector, OfflineClient};
    use callcenter_core::backend::MockTelecomBackend;
    use callcenter_core::domain::conversation::Role;
    use callcenter_db::{
        HistoryRepository, InMemoryHistoryRepository, RepositoryError, StoredMessage,
    };

    use super::ChatService;

    /// Stores customer lines but refuses bot lines.
    #[derive(Default)]
    struct BotWritesFail {
        inner: InMemoryHistoryRepository,
    }

    #[async_trait]
    impl HistoryRepository for BotWritesFail {
        async fn append(
            &self,
            user_id: &str,
            role: Role,
            message: &str,
        ) -> Result<StoredMessage, RepositoryError> {
            match role {
                Role::Bot => Err(RepositoryError::Decode("disk full".to_string())),
                Role::User => self.inner.append(user_id, role, message).await,
            }
        }

        async fn list(
            &self,
            user_id: &str,
            limit: Option<u32>,
        ) -> Result<Vec<StoredMessage>, RepositoryError> {
            self.inner.list(user_id, limit).await
        }

        async fn clear(&self, user_id: &str) -> Result<u64, RepositoryError> {
            self.inner.clear(user_id).await
        }
    }

    fn runtime() -> AgentRuntime {
        AgentRuntime::builder(Arc::new(OfflineClient), Arc::new(MockTelecomBackend::new()))
            .selector(Arc::new(FixedSelector(0)))
            .build()
            .expect("runtime")
    }

    fn service() -> ChatService {
        ChatService::new(runtime(), Arc::new(InMemoryHistoryRepository::default()))
    }

    #[tokio::test]
    async fn reply_is_returned_when_it_cannot_be_stored() {
        let service = ChatService::new(runtime(), Arc::new(BotWritesFail::default()));

        let reply = service.send("u1", "9").await.expect("reply should survive the failed write");
        assert!(reply.starts_with("Çok teşekkür ederiz!"));
        assert_eq!(service.satisfaction("u1").await.rating, Some(9));

        let lines = service.history("u1", None).await.expect("history");
        let roles: Vec<Role> = lines.iter().map(|line| line.role).collect();
        assert_eq!(roles, vec![Role::User]);
    }

    #[tokio::test]
    async fn every_exchange_is_logged() {
        let service = service();
        let reply = service.send("05551234567", "Şifremi unuttum").await.expect("send");
        service.send("05551234567", "8").await.expect("rating");

        let lines = service.history("05551234567", None).await.expect("history");
        let roles: Vec<Role> = lines.iter().map(|line| line.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot, Role::User, Role::Bot]);
        assert_eq!(lines[1].message, reply);
        assert_eq!(lines[2].message, "8");
    }

    #[tokio::test]
    async fn panel_reflects_rating_and_reset_clears_it() {
        let service = service();
        service.send("u1", "10").await.expect("rating");

        let panel = service.satisfaction("u1").await;
        assert_eq!(panel.rating, Some(10));
        assert_eq!(panel.sentiment.map(|s| s.satisfaction_score), Some(10.0));

        assert_eq!(service.reset("u1").await.expect("reset"), 2);
        assert_eq!(service.satisfaction("u1").await.rating, None);
        assert!(service.history("u1", None).await.expect("history").is_empty());
    }
}
