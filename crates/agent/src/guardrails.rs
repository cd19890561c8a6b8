use callcenter_core::domain::intent::{Intent, IntentAnalysis};
use callcenter_core::domain::tool::{ToolExecutionResult, ToolId};

use crate::replies::{PhraseSelector, OUT_OF_DOMAIN_REPLIES};
use crate::text::{contains_any, fold_case};

pub const DOMAIN_KEYWORDS: &[&str] =
    &["fatura", "paket", "internet", "hat", "ödeme", "sözleşme", "müşteri", "teknik"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Deny { reason_code: &'static str, user_message: &'static str },
}

/// Refuses general questions whose knowledge-base answer has nothing to do with telecom.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomainGuard;

impl DomainGuard {
    pub fn new() -> Self {
        Self
    }

    /// Only a general question planned as a single knowledge search is checked.
    pub fn applies_to(&self, analysis: &IntentAnalysis) -> bool {
        analysis.intent == Intent::GeneralQuestion
            && matches!(
                analysis.required_tools.as_slice(),
                [tool] if tool == ToolId::KnowledgeSearch.code()
            )
    }

    pub fn evaluate(
        &self,
        analysis: &IntentAnalysis,
        tool_results: &[ToolExecutionResult],
        selector: &dyn PhraseSelector,
    ) -> GuardrailDecision {
        if !self.applies_to(analysis) {
            return GuardrailDecision::Allow;
        }
        let Some(first) = tool_results.first() else {
            return GuardrailDecision::Allow;
        };

        let reason_code = match first.payload() {
            None => "knowledge_search_empty",
            Some(answer) if !contains_any(&fold_case(answer), DOMAIN_KEYWORDS) => {
                "out_of_domain"
            }
            Some(_) => return GuardrailDecision::Allow,
        };
        GuardrailDecision::Deny { reason_code, user_message: selector.pick(OUT_OF_DOMAIN_REPLIES) }
    }
}
