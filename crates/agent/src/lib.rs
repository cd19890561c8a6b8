//! Dialogue engine for the telecom support assistant.
//!
//! Every customer message runs through one turn:
//! 1. **Sentiment** (`sentiment`) - scored on every message, kept per user
//! 2. **Survey** (`survey`) - bare ratings, closing and thanks messages end the turn early
//! 3. **Intent** (`intent`) - model classification with a keyword fallback
//! 4. **Tools** (`tools`) - validated, typed calls into the telecom backend
//! 5. **Guardrails** (`guardrails`) - refuses questions outside the telecom domain
//! 6. **Composer** (`composer`) - picks the payload that answers the turn and phrases it
//!
//! # Key Types
//!
//! - `AgentRuntime` - orchestrator and public surface (see `runtime`)
//! - `LlmClient` - pluggable completion backend; `OfflineClient` keeps the engine on its
//!   deterministic fallbacks
//! - `ConversationStore` - per-user state behind per-user locks
//!
//! The model only classifies and phrases. Account data, amounts and eligibility come from
//! the backend and are never invented by the model.

pub mod composer;
pub mod guardrails;
pub mod intent;
pub mod llm;
pub mod prompts;
pub mod replies;
pub mod runtime;
pub mod sentiment;
pub mod state;
pub mod survey;
pub mod text;
pub mod tools;

pub use llm::{client_from_config, LlmClient, LlmError, OfflineClient, OllamaClient};
pub use replies::{FixedSelector, PhraseSelector, RandomSelector, SeededSelector};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder};
