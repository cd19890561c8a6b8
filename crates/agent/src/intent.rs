use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use callcenter_core::domain::conversation::{render_transcript, HistoryEntry};
use callcenter_core::domain::intent::{AnalysisSource, Intent, IntentAnalysis, ResponseType};
use callcenter_core::domain::telecom::BillingPeriod;
use callcenter_core::domain::tool::ToolId;
use callcenter_core::errors::AgentError;

use crate::llm::{extract_json_object, LlmClient, LlmError};
use crate::prompts::PromptLibrary;
use crate::text::{contains_any, fold_case};

/// History turns shown to the model when classifying a message.
pub const INTENT_HISTORY_TURNS: usize = 5;

struct KeywordRule {
    keywords: &'static [&'static str],
    intent: Intent,
    tools: &'static [ToolId],
    response_type: ResponseType,
    confidence: f64,
}

const KEYWORD_RULES: [KeywordRule; 3] = [
    KeywordRule {
        keywords: &["fatura", "ödeme", "borç", "para"],
        intent: Intent::BillingInquiry,
        tools: &[ToolId::CustomerInfo, ToolId::BillingInfo],
        response_type: ResponseType::MultiStep,
        confidence: 0.8,
    },
    KeywordRule {
        keywords: &["paket", "tarife", "değiştir", "yükselt", "düşür"],
        intent: Intent::PackageChange,
        tools: &[ToolId::CustomerInfo, ToolId::PackageList],
        response_type: ResponseType::MultiStep,
        confidence: 0.85,
    },
    KeywordRule {
        keywords: &["şifre", "parola", "giriş", "unut"],
        intent: Intent::PasswordReset,
        tools: &[ToolId::PasswordReset],
        response_type: ResponseType::Immediate,
        confidence: 0.9,
    },
];

const GENERAL_CONFIDENCE: f64 = 0.6;

/// Model output before validation. Every field is required.
#[derive(Deserialize)]
struct RawAnalysis {
    intent: String,
    confidence: f64,
    required_tools: Vec<String>,
    parameters: Map<String, Value>,
    context_update: Map<String, Value>,
    response_type: ResponseType,
}

/// Parses and validates a model completion into an [`IntentAnalysis`].
///
/// Unknown tool ids are kept so the executor can report them; an unknown intent code
/// rejects the whole analysis.
pub fn parse_intent_analysis(completion: &str) -> Result<IntentAnalysis, LlmError> {
    let json = extract_json_object(completion)
        .ok_or_else(|| LlmError::Malformed("no JSON object in completion".to_string()))?;
    let raw: RawAnalysis =
        serde_json::from_str(json).map_err(|err| LlmError::Malformed(err.to_string()))?;

    let intent = Intent::from_code(&raw.intent)
        .ok_or_else(|| LlmError::Malformed(format!("unknown intent `{}`", raw.intent)))?;
    if !raw.confidence.is_finite() {
        return Err(LlmError::Malformed("confidence is not a finite number".to_string()));
    }

    Ok(IntentAnalysis {
        intent,
        confidence: raw.confidence.clamp(0.0, 1.0),
        required_tools: raw.required_tools,
        parameters: raw.parameters,
        context_update: raw.context_update,
        response_type: raw.response_type,
        source: AnalysisSource::LanguageModel,
    })
}

/// Classifies a customer message, asking the model first and falling back to keywords.
pub struct IntentResolver {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLibrary>,
    default_period: BillingPeriod,
}

impl IntentResolver {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        prompts: Arc<PromptLibrary>,
        default_period: BillingPeriod,
    ) -> Self {
        Self { llm, prompts, default_period }
    }

    pub async fn resolve(&self, message: &str, history: &[HistoryEntry]) -> IntentAnalysis {
        match self.analyze_with_model(message, history).await {
            Ok(analysis) => analysis,
            Err(error) => {
                info!(
                    event_name = "agent.intent.fallback",
                    error_class = error.class(),
                    error = %error,
                    "intent analysis fell back to keywords"
                );
                self.fallback(message)
            }
        }
    }

    async fn analyze_with_model(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<IntentAnalysis, AgentError> {
        let prompt = self
            .prompts
            .intent(message, &render_transcript(history))
            .map_err(|err| AgentError::System(err.to_string()))?;
        let completion = self.llm.complete(&prompt).await?;
        debug!(event_name = "agent.intent.completion", completion = %completion, "model replied");
        Ok(parse_intent_analysis(&completion)?)
    }

    /// Deterministic keyword classification; the first matching rule wins.
    pub fn fallback(&self, message: &str) -> IntentAnalysis {
        let normalized = fold_case(message);
        let rule = KEYWORD_RULES.iter().find(|rule| contains_any(&normalized, rule.keywords));

        let Some(rule) = rule else {
            let mut parameters = Map::new();
            parameters.insert("query".to_string(), Value::String(message.to_string()));
            return IntentAnalysis {
                intent: Intent::GeneralQuestion,
                confidence: GENERAL_CONFIDENCE,
                required_tools: vec![ToolId::KnowledgeSearch.code().to_string()],
                parameters,
                context_update: Map::new(),
                response_type: ResponseType::Immediate,
                source: AnalysisSource::KeywordFallback,
            };
        };

        let mut parameters = Map::new();
        if rule.tools.contains(&ToolId::BillingInfo) {
            parameters.insert(
                "period".to_string(),
                Value::String(self.default_period.as_str().to_string()),
            );
        }

        IntentAnalysis {
            intent: rule.intent,
            confidence: rule.confidence,
            required_tools: rule.tools.iter().map(|tool| tool.code().to_string()).collect(),
            parameters,
            context_update: Map::new(),
            response_type: rule.response_type,
            source: AnalysisSource::KeywordFallback,
        }
    }
}
