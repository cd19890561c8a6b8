use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use callcenter_core::backend::TelecomBackend;
use callcenter_core::config::AgentConfig;
use callcenter_core::domain::conversation::ConversationState;
use callcenter_core::domain::intent::ResponseType;
use callcenter_core::domain::satisfaction::{SatisfactionRating, SatisfactionState};
use callcenter_core::domain::sentiment::SentimentResult;
use callcenter_core::domain::telecom::BillingPeriod;
use callcenter_core::domain::tool::ToolId;
use callcenter_core::errors::AgentError;

use crate::composer::{Clarification, ResponseComposer};
use crate::guardrails::{DomainGuard, GuardrailDecision};
use crate::intent::{IntentResolver, INTENT_HISTORY_TURNS};
use crate::llm::LlmClient;
use crate::prompts::{PromptError, PromptLibrary};
use crate::replies::{PhraseSelector, RandomSelector, SeededSelector};
use crate::sentiment::SentimentTracker;
use crate::state::ConversationStore;
use crate::survey::{self, SurveyTrigger};
use crate::tools::ToolRegistry;

pub struct AgentRuntimeBuilder {
    llm: Arc<dyn LlmClient>,
    backend: Arc<dyn TelecomBackend>,
    selector: Arc<dyn PhraseSelector>,
    default_period: BillingPeriod,
}

impl AgentRuntimeBuilder {
    pub fn selector(mut self, selector: Arc<dyn PhraseSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn default_billing_period(mut self, period: BillingPeriod) -> Self {
        self.default_period = period;
        self
    }

    /// Applies the `agent` config section: billing period and optional reply seed.
    pub fn with_config(self, config: &AgentConfig) -> Self {
        let builder = self.default_billing_period(config.default_billing_period);
        match config.reply_seed {
            Some(seed) => builder.selector(Arc::new(SeededSelector::new(seed))),
            None => builder,
        }
    }

    pub fn build(self) -> Result<AgentRuntime, PromptError> {
        let prompts = Arc::new(PromptLibrary::new()?);
        let inner = RuntimeInner {
            store: ConversationStore::new(),
            tools: ToolRegistry::new(self.backend),
            intents: IntentResolver::new(
                Arc::clone(&self.llm),
                Arc::clone(&prompts),
                self.default_period,
            ),
            sentiment: SentimentTracker::new(Arc::clone(&self.llm), Arc::clone(&prompts)),
            composer: ResponseComposer::new(self.llm, prompts),
            guard: DomainGuard::new(),
            selector: self.selector,
        };
        Ok(AgentRuntime { inner: Arc::new(inner) })
    }
}

struct RuntimeInner {
    store: ConversationStore,
    tools: ToolRegistry,
    intents: IntentResolver,
    sentiment: SentimentTracker,
    composer: ResponseComposer,
    guard: DomainGuard,
    selector: Arc<dyn PhraseSelector>,
}

/// The dialogue engine. Cheap to clone; clones share conversation state.
#[derive(Clone)]
pub struct AgentRuntime {
    inner: Arc<RuntimeInner>,
}

impl AgentRuntime {
    pub fn builder(
        llm: Arc<dyn LlmClient>,
        backend: Arc<dyn TelecomBackend>,
    ) -> AgentRuntimeBuilder {
        AgentRuntimeBuilder {
            llm,
            backend,
            selector: Arc::new(RandomSelector),
            default_period: BillingPeriod::default(),
        }
    }

    /// Answers one customer message. Always returns a reply; a panic inside the turn is
    /// reported as the generic system apology.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        let span = info_span!("agent.turn", correlation_id = %correlation_id, user_id = %user_id);

        let inner = Arc::clone(&self.inner);
        let (owned_user, owned_message) = (user_id.to_string(), message.to_string());
        let turn = tokio::spawn(
            async move { inner.turn(&owned_user, &owned_message).await }.instrument(span),
        );

        match turn.await {
            Ok(reply) => reply,
            Err(join_error) => {
                let error = AgentError::System(join_error.to_string());
                error!(
                    event_name = "agent.turn.aborted",
                    correlation_id = %correlation_id,
                    error_class = error.class(),
                    error = %error,
                    "turn task did not complete"
                );
                error.user_message()
            }
        }
    }

    pub async fn get_satisfaction_rating(&self, user_id: &str) -> Option<SatisfactionRating> {
        self.inner.store.feedback(user_id).await.and_then(|feedback| feedback.satisfaction.rating)
    }

    pub async fn get_sentiment_result(&self, user_id: &str) -> Option<SentimentResult> {
        self.inner.store.feedback(user_id).await.and_then(|feedback| feedback.sentiment)
    }

    pub async fn satisfaction_state(&self, user_id: &str) -> SatisfactionState {
        self.inner
            .store
            .feedback(user_id)
            .await
            .map(|feedback| feedback.satisfaction)
            .unwrap_or_default()
    }

    pub async fn clear_satisfaction_data(&self, user_id: &str) {
        self.inner.store.clear_satisfaction(user_id).await;
        info!(event_name = "agent.satisfaction.cleared", user_id, "satisfaction data cleared");
    }

    pub async fn conversation(&self, user_id: &str) -> Option<ConversationState> {
        self.inner.store.conversation(user_id).await
    }
}

impl RuntimeInner {
    async fn turn(&self, user_id: &str, message: &str) -> String {
        info!(event_name = "agent.turn.received", "customer message received");
        let mut session = self.store.lock(user_id).await;

        session.set_sentiment(self.sentiment.analyze(message).await).await;

        if let Some(trigger) = SurveyTrigger::detect(message) {
            let reply = session
                .update_feedback(|feedback| {
                    if let SurveyTrigger::Rating(rating) = trigger {
                        feedback.sentiment = Some(SentimentResult::manual_rating(rating));
                    }
                    survey::respond(trigger, &mut feedback.satisfaction, self.selector.as_ref())
                })
                .await;
            info!(
                event_name = "agent.turn.survey",
                trigger = trigger.as_str(),
                "turn answered by the satisfaction survey"
            );
            return reply.to_string();
        }

        session.conversation.push_user(message);
        let analysis = self
            .intents
            .resolve(message, session.conversation.recent(INTENT_HISTORY_TURNS))
            .await;
        info!(
            event_name = "agent.intent.resolved",
            intent = analysis.intent.code(),
            confidence = analysis.confidence,
            source = ?analysis.source,
            tools = ?analysis.required_tools,
            "intent resolved"
        );

        session.conversation.current_intent = analysis.intent;
        session.conversation.merge_context(&analysis.context_update);
        let clarification = (analysis.response_type == ResponseType::Clarification)
            .then(|| Clarification { missing_parameters: analysis.missing_parameters() });

        let mut results = Vec::with_capacity(analysis.required_tools.len());
        for tool in &analysis.required_tools {
            let result = self.tools.execute(tool, &analysis.parameters, user_id).await;
            let lookup_failed = !result.success && tool == ToolId::CustomerInfo.code();
            results.push(result);

            if lookup_failed {
                let error = AgentError::CustomerLookupFailure { user_id: user_id.to_string() };
                warn!(
                    event_name = "agent.turn.customer_lookup_failed",
                    error_class = error.class(),
                    error = %error,
                    "ending turn after failed customer lookup"
                );
                let reply = error.user_message();
                session.conversation.push_bot(reply.clone());
                return reply;
            }
        }

        if let GuardrailDecision::Deny { reason_code, user_message } =
            self.guard.evaluate(&analysis, &results, self.selector.as_ref())
        {
            info!(event_name = "agent.turn.out_of_domain", reason_code, "question refused");
            session.conversation.push_bot(user_message);
            return user_message.to_string();
        }

        let reply = self
            .composer
            .compose(message, &results, &session.conversation, clarification.as_ref())
            .await;
        session.conversation.push_bot(reply.clone());
        info!(event_name = "agent.turn.replied", "reply composed");
        reply
    }
}
