use std::sync::Arc;

use tracing::{debug, warn};

use callcenter_core::domain::conversation::ConversationState;
use callcenter_core::domain::tool::{ToolExecutionResult, ToolId};
use callcenter_core::errors::{AgentError, LANGUAGE_MODEL_FAILURE_MESSAGE};

use crate::llm::LlmClient;
use crate::prompts::PromptLibrary;
use crate::replies::{AUTO_PAY_OFFER, CLARIFICATION_QUESTION, TRAILER};

/// Tools whose payload alone answers the turn, most important first.
const PAYLOAD_PRIORITY: [ToolId; 4] =
    [ToolId::Payment, ToolId::ChangePackage, ToolId::BillingInfo, ToolId::CustomerInfo];

const OVERDUE_MARKERS: [&str; 2] = ["Gecikmiş", "Ödenmedi"];
const AUTO_PAY_THRESHOLD: usize = 2;

/// History turns quoted in the free-form reply prompt.
pub const GENERAL_HISTORY_TURNS: usize = 3;

/// The plan asked the customer for more detail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clarification {
    pub missing_parameters: Vec<String>,
}

struct SelectedPayload {
    text: String,
    tools: Vec<String>,
}

impl SelectedPayload {
    fn from_results(results: &[ToolExecutionResult]) -> Option<Self> {
        for tool in PAYLOAD_PRIORITY {
            let payload = results
                .iter()
                .filter(|result| result.is_success_of(tool))
                .find_map(ToolExecutionResult::payload);
            if let Some(text) = payload {
                return Some(Self { text: text.to_string(), tools: vec![tool.code().to_string()] });
            }
        }

        let (texts, tools): (Vec<&str>, Vec<String>) = results
            .iter()
            .filter_map(|result| result.payload().map(|text| (text, result.tool_used.clone())))
            .unzip();
        if texts.is_empty() {
            return None;
        }
        Some(Self { text: texts.join("\n"), tools })
    }

    fn offers_auto_pay(&self) -> bool {
        let billing_selected = self.tools.iter().any(|tool| tool == ToolId::BillingInfo.code());
        let overdue: usize =
            OVERDUE_MARKERS.iter().map(|marker| self.text.matches(marker).count()).sum();
        billing_selected && overdue >= AUTO_PAY_THRESHOLD
    }
}

fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|ch| matches!(ch, '"' | '\u{201C}' | '\u{201D}')).trim()
}

pub struct ResponseComposer {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLibrary>,
}

impl ResponseComposer {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLibrary>) -> Self {
        Self { llm, prompts }
    }

    /// Builds the customer reply from this turn's tool results. Never fails; model
    /// problems degrade to the raw payload or a fixed apology.
    pub async fn compose(
        &self,
        user_message: &str,
        tool_results: &[ToolExecutionResult],
        state: &ConversationState,
        clarification: Option<&Clarification>,
    ) -> String {
        let password_reset = tool_results
            .iter()
            .filter(|result| result.is_success_of(ToolId::PasswordReset))
            .find_map(ToolExecutionResult::payload);
        if let Some(payload) = password_reset {
            return format!("{payload}{TRAILER}");
        }

        if let Some(selected) = SelectedPayload::from_results(tool_results) {
            return self.summarize(&selected).await;
        }

        if let Some(clarification) = clarification {
            debug!(
                event_name = "agent.composer.clarification",
                missing = ?clarification.missing_parameters,
                "asking the customer for the billing period"
            );
            return format!("{CLARIFICATION_QUESTION}{TRAILER}");
        }

        self.free_form(user_message, tool_results, state).await
    }

    async fn summarize(&self, selected: &SelectedPayload) -> String {
        let paraphrased = match self.paraphrase(&selected.text).await {
            Ok(text) => text,
            Err(error) => {
                warn!(
                    event_name = "agent.composer.paraphrase_failed",
                    error_class = error.class(),
                    error = %error,
                    "using the raw tool payload"
                );
                selected.text.clone()
            }
        };

        let mut reply = paraphrased;
        if selected.offers_auto_pay() {
            reply.push_str(AUTO_PAY_OFFER);
        }
        reply.push_str(TRAILER);
        reply
    }

    async fn paraphrase(&self, payload: &str) -> Result<String, AgentError> {
        let prompt =
            self.prompts.paraphrase(payload).map_err(|err| AgentError::System(err.to_string()))?;
        let completion = self.llm.complete(&prompt).await?;
        let text = strip_quotes(&completion);
        if text.is_empty() {
            return Err(AgentError::LanguageModelMalformedOutput("blank paraphrase".to_string()));
        }
        Ok(text.to_string())
    }

    async fn free_form(
        &self,
        user_message: &str,
        tool_results: &[ToolExecutionResult],
        state: &ConversationState,
    ) -> String {
        let tool_lines: Vec<String> = tool_results
            .iter()
            .map(|result| match (&result.result, &result.error) {
                (Some(text), _) if result.success => {
                    format!("Araç Sonucu ({}): {text}", result.tool_used)
                }
                (_, error) => {
                    format!("Hata ({}): {}", result.tool_used, error.as_deref().unwrap_or_default())
                }
            })
            .collect();

        let prompt = match self.prompts.general(
            user_message,
            &state.transcript(GENERAL_HISTORY_TURNS),
            &tool_lines,
            &state.context,
        ) {
            Ok(prompt) => prompt,
            Err(err) => return self.apology(&AgentError::System(err.to_string())),
        };

        match self.llm.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => format!("{}{TRAILER}", text.trim()),
            Ok(_) => self.apology(&AgentError::LanguageModelMalformedOutput(
                "blank reply".to_string(),
            )),
            Err(error) => self.apology(&AgentError::from(error)),
        }
    }

    fn apology(&self, error: &AgentError) -> String {
        warn!(
            event_name = "agent.composer.reply_failed",
            error_class = error.class(),
            error = %error,
            "free-form reply unavailable"
        );
        LANGUAGE_MODEL_FAILURE_MESSAGE.to_string()
    }
}
