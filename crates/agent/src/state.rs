use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use callcenter_core::domain::conversation::ConversationState;
use callcenter_core::domain::satisfaction::SatisfactionState;
use callcenter_core::domain::sentiment::SentimentResult;

/// Survey state and the latest sentiment of one customer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feedback {
    pub satisfaction: SatisfactionState,
    pub sentiment: Option<SentimentResult>,
}

/// One customer's entry. The conversation is locked for a whole turn; feedback has its own
/// short-lived lock so readers never wait on a turn.
#[derive(Debug)]
struct UserSlot {
    conversation: Arc<Mutex<ConversationState>>,
    feedback: Arc<RwLock<Feedback>>,
}

impl UserSlot {
    fn new(user_id: &str) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(ConversationState::new(user_id))),
            feedback: Arc::new(RwLock::new(Feedback::default())),
        }
    }
}

/// Exclusive access to a customer for the length of one turn.
pub struct TurnGuard {
    pub conversation: OwnedMutexGuard<ConversationState>,
    feedback: Arc<RwLock<Feedback>>,
}

impl TurnGuard {
    pub async fn set_sentiment(&self, sentiment: SentimentResult) {
        self.feedback.write().await.sentiment = Some(sentiment);
    }

    /// Runs `update` under the feedback write lock. Keep it synchronous and short.
    pub async fn update_feedback<R>(&self, update: impl FnOnce(&mut Feedback) -> R) -> R {
        let mut feedback = self.feedback.write().await;
        update(&mut feedback)
    }
}

/// Per-user state. A turn holds its user's conversation lock from start to finish, so turns
/// for one user serialize while other users proceed.
#[derive(Debug, Default)]
pub struct ConversationStore {
    users: RwLock<HashMap<String, UserSlot>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn existing_feedback(&self, user_id: &str) -> Option<Arc<RwLock<Feedback>>> {
        self.users.read().await.get(user_id).map(|slot| Arc::clone(&slot.feedback))
    }

    /// Locks the user's conversation, creating the user on first contact.
    pub async fn lock(&self, user_id: &str) -> TurnGuard {
        let existing = self
            .users
            .read()
            .await
            .get(user_id)
            .map(|slot| (Arc::clone(&slot.conversation), Arc::clone(&slot.feedback)));

        let (conversation, feedback) = match existing {
            Some(handles) => handles,
            None => {
                let mut users = self.users.write().await;
                let slot =
                    users.entry(user_id.to_string()).or_insert_with(|| UserSlot::new(user_id));
                (Arc::clone(&slot.conversation), Arc::clone(&slot.feedback))
            }
        };

        TurnGuard { conversation: conversation.lock_owned().await, feedback }
    }

    /// Current feedback. Never waits for a running turn.
    pub async fn feedback(&self, user_id: &str) -> Option<Feedback> {
        let feedback = self.existing_feedback(user_id).await?;
        let snapshot = feedback.read().await.clone();
        Some(snapshot)
    }

    /// Copy of the conversation. Waits for a running turn of the same user.
    pub async fn conversation(&self, user_id: &str) -> Option<ConversationState> {
        let conversation =
            self.users.read().await.get(user_id).map(|slot| Arc::clone(&slot.conversation))?;
        let snapshot = conversation.lock().await.clone();
        Some(snapshot)
    }

    /// Forgets rating, sentiment and the survey flag. History and context stay; unknown
    /// users are left alone.
    pub async fn clear_satisfaction(&self, user_id: &str) {
        if let Some(feedback) = self.existing_feedback(user_id).await {
            *feedback.write().await = Feedback::default();
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
