use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use callcenter_core::domain::sentiment::{SentimentLabel, SentimentResult};
use callcenter_core::errors::AgentError;

use crate::llm::{extract_json_object, LlmClient, LlmError};
use crate::prompts::PromptLibrary;
use crate::text::fold_case;

const POSITIVE_WORDS: &[&str] =
    &["teşekkür", "güzel", "iyi", "memnun", "harika", "süper", "çok iyi"];
const NEGATIVE_WORDS: &[&str] =
    &["kötü", "berbat", "memnun değil", "sorun", "problem", "kızgın", "sinirli"];

#[derive(Deserialize)]
struct RawSentiment {
    sentiment: String,
    confidence: f64,
    emotion: String,
    satisfaction_score: f64,
}

/// Validates a model completion. Only the three classified labels are accepted; the
/// score is clamped into 0..=10.
pub fn parse_sentiment(completion: &str) -> Result<SentimentResult, LlmError> {
    let json = extract_json_object(completion)
        .ok_or_else(|| LlmError::Malformed("no JSON object in completion".to_string()))?;
    let raw: RawSentiment =
        serde_json::from_str(json).map_err(|err| LlmError::Malformed(err.to_string()))?;

    let label = SentimentLabel::parse_classified(&raw.sentiment)
        .ok_or_else(|| LlmError::Malformed(format!("unknown sentiment `{}`", raw.sentiment)))?;
    if !raw.confidence.is_finite() || !raw.satisfaction_score.is_finite() {
        return Err(LlmError::Malformed("sentiment numbers must be finite".to_string()));
    }

    Ok(SentimentResult::new(label, raw.confidence, raw.emotion, raw.satisfaction_score))
}

/// Word-count classifier used when the model is unavailable.
pub fn lexicon_sentiment(message: &str) -> SentimentResult {
    let normalized = fold_case(message);
    let count = |words: &[&str]| words.iter().filter(|word| normalized.contains(*word)).count();
    let positive = count(POSITIVE_WORDS);
    let negative = count(NEGATIVE_WORDS);

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => {
            SentimentResult::new(SentimentLabel::Positive, 0.7, "satisfied", 8.0)
        }
        std::cmp::Ordering::Less => {
            SentimentResult::new(SentimentLabel::Negative, 0.7, "frustrated", 3.0)
        }
        std::cmp::Ordering::Equal => SentimentResult::neutral(),
    }
}

pub struct SentimentTracker {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLibrary>,
}

impl SentimentTracker {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLibrary>) -> Self {
        Self { llm, prompts }
    }

    pub async fn analyze(&self, message: &str) -> SentimentResult {
        match self.analyze_with_model(message).await {
            Ok(result) => result,
            Err(error) => {
                info!(
                    event_name = "agent.sentiment.fallback",
                    error_class = error.class(),
                    error = %error,
                    "sentiment analysis fell back to the lexicon"
                );
                lexicon_sentiment(message)
            }
        }
    }

    async fn analyze_with_model(&self, message: &str) -> Result<SentimentResult, AgentError> {
        let prompt =
            self.prompts.sentiment(message).map_err(|err| AgentError::System(err.to_string()))?;
        let completion = self.llm.complete(&prompt).await?;
        Ok(parse_sentiment(&completion)?)
    }
}
