pub mod backend;
pub mod config;
pub mod domain;
pub mod errors;

pub use backend::{BackendError, MockTelecomBackend, TelecomBackend};
pub use domain::conversation::{ConversationState, HistoryEntry, Role};
pub use domain::intent::{AnalysisSource, Intent, IntentAnalysis, ResponseType};
pub use domain::satisfaction::{RatingTier, SatisfactionRating, SatisfactionState, SurveyStage};
pub use domain::sentiment::{SentimentLabel, SentimentResult};
pub use domain::tool::{ParamKind, ParamSpec, ToolExecutionResult, ToolId, ToolSpec};
pub use errors::AgentError;
