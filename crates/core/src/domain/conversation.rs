use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::intent::Intent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "bot" => Some(Self::Bot),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: Role, message: impl Into<String>) -> Self {
        Self { role, message: message.into(), timestamp: Utc::now() }
    }
}

/// Per-user dialogue memory kept for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_id: String,
    pub current_intent: Intent,
    pub context: Map<String, Value>,
    pub pending_actions: Vec<String>,
    pub conversation_history: Vec<HistoryEntry>,
}

impl ConversationState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current_intent: Intent::default(),
            context: Map::new(),
            pending_actions: Vec::new(),
            conversation_history: Vec::new(),
        }
    }

    pub fn push_user(&mut self, message: impl Into<String>) {
        self.conversation_history.push(HistoryEntry::new(Role::User, message));
    }

    pub fn push_bot(&mut self, message: impl Into<String>) {
        self.conversation_history.push(HistoryEntry::new(Role::Bot, message));
    }

    /// Shallow merge: top-level keys from `update` replace existing ones.
    pub fn merge_context(&mut self, update: &Map<String, Value>) {
        for (key, value) in update {
            self.context.insert(key.clone(), value.clone());
        }
    }

    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        let start = self.conversation_history.len().saturating_sub(count);
        &self.conversation_history[start..]
    }

    /// Renders the last `count` turns as `role: message` lines.
    pub fn transcript(&self, count: usize) -> String {
        render_transcript(self.recent(count))
    }
}

pub fn render_transcript(entries: &[HistoryEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}: {}", entry.role.as_str(), entry.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::{ConversationState, Role};
    use crate::domain::intent::Intent;

    #[test]
    fn new_state_starts_as_general_question() {
        let state = ConversationState::new("05551234567");
        assert_eq!(state.current_intent, Intent::GeneralQuestion);
        assert!(state.context.is_empty());
        assert!(state.pending_actions.is_empty());
        assert!(state.conversation_history.is_empty());
    }

    #[test]
    fn context_merge_is_shallow() {
        let mut state = ConversationState::new("u1");
        let mut first = Map::new();
        first.insert("plan".to_string(), json!({"name": "PN1", "region": "İstanbul"}));
        first.insert("period".to_string(), json!("current"));
        state.merge_context(&first);

        let mut second = Map::new();
        second.insert("plan".to_string(), json!({"name": "PN3"}));
        state.merge_context(&second);

        assert_eq!(state.context.get("plan"), Some(&json!({"name": "PN3"})));
        assert_eq!(state.context.get("period"), Some(&json!("current")));
    }

    #[test]
    fn transcript_keeps_turn_order_and_window() {
        let mut state = ConversationState::new("u1");
        state.push_user("merhaba");
        state.push_bot("Size nasıl yardımcı olabilirim?");
        state.push_user("faturam ne kadar");

        assert_eq!(state.recent(2).len(), 2);
        assert_eq!(state.recent(2)[0].role, Role::Bot);
        assert_eq!(state.recent(10).len(), 3);
        assert_eq!(
            state.transcript(2),
            "bot: Size nasıl yardımcı olabilirim?\nuser: faturam ne kadar"
        );
    }
}
