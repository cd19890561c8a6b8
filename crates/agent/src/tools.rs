use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{info, warn};

use callcenter_core::backend::{BackendError, TelecomBackend};
use callcenter_core::domain::telecom::{
    BillingPeriod, BillingSummary, CustomerProfile, PackageOffer,
};
use callcenter_core::domain::tool::{ParamKind, ToolExecutionResult, ToolId, ToolSpec};
use callcenter_core::errors::AgentError;

const SHOWN_RECOMMENDATIONS: usize = 2;

/// A validated, fully typed tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolCall {
    CustomerInfo { user_id: String },
    BillingInfo { user_id: String, period: BillingPeriod },
    PackageList { user_id: String },
    ChangePackage { user_id: String, package_id: String },
    PasswordReset { user_id: String },
    CreateTicket { user_id: String, issue_type: String, description: String },
    Payment { user_id: String, amount: Decimal, payment_method: String },
    ContractInfo { user_id: String },
    ActivateService { user_id: String, service_type: String },
    KnowledgeSearch { query: String },
}

impl ToolCall {
    /// Validates `parameters` against the tool schema in declaration order and builds the
    /// typed call. Parameters the schema does not declare are ignored.
    pub fn parse(tool: ToolId, parameters: &Map<String, Value>) -> Result<Self, AgentError> {
        let arguments = Arguments::validate(&tool.spec(), parameters)?;

        Ok(match tool {
            ToolId::CustomerInfo => Self::CustomerInfo { user_id: arguments.text("user_id") },
            ToolId::BillingInfo => Self::BillingInfo {
                user_id: arguments.text("user_id"),
                period: BillingPeriod::parse_lossy(&arguments.text("period")),
            },
            ToolId::PackageList => Self::PackageList { user_id: arguments.text("user_id") },
            ToolId::ChangePackage => Self::ChangePackage {
                user_id: arguments.text("user_id"),
                package_id: arguments.text("new_package_id"),
            },
            ToolId::PasswordReset => Self::PasswordReset { user_id: arguments.text("user_id") },
            ToolId::CreateTicket => Self::CreateTicket {
                user_id: arguments.text("user_id"),
                issue_type: arguments.text("issue_type"),
                description: arguments.text("description"),
            },
            ToolId::Payment => Self::Payment {
                user_id: arguments.text("user_id"),
                amount: arguments.number("amount"),
                payment_method: arguments.text("payment_method"),
            },
            ToolId::ContractInfo => Self::ContractInfo { user_id: arguments.text("user_id") },
            ToolId::ActivateService => Self::ActivateService {
                user_id: arguments.text("user_id"),
                service_type: arguments.text("service_type"),
            },
            ToolId::KnowledgeSearch => Self::KnowledgeSearch { query: arguments.text("query") },
        })
    }

    pub fn tool(&self) -> ToolId {
        match self {
            Self::CustomerInfo { .. } => ToolId::CustomerInfo,
            Self::BillingInfo { .. } => ToolId::BillingInfo,
            Self::PackageList { .. } => ToolId::PackageList,
            Self::ChangePackage { .. } => ToolId::ChangePackage,
            Self::PasswordReset { .. } => ToolId::PasswordReset,
            Self::CreateTicket { .. } => ToolId::CreateTicket,
            Self::Payment { .. } => ToolId::Payment,
            Self::ContractInfo { .. } => ToolId::ContractInfo,
            Self::ActivateService { .. } => ToolId::ActivateService,
            Self::KnowledgeSearch { .. } => ToolId::KnowledgeSearch,
        }
    }
}

#[derive(Default)]
struct Arguments {
    text: HashMap<&'static str, String>,
    numbers: HashMap<&'static str, Decimal>,
}

impl Arguments {
    fn validate(spec: &ToolSpec, parameters: &Map<String, Value>) -> Result<Self, AgentError> {
        let mut arguments = Self::default();

        for parameter in spec.parameters {
            let value = parameters.get(parameter.name).filter(|value| !is_blank(value));
            let Some(value) = value else {
                return Err(AgentError::MissingParameter {
                    tool: spec.id.code().to_string(),
                    parameter: parameter.name.to_string(),
                    kind: parameter.kind,
                });
            };

            let mismatch = || AgentError::TypeMismatch {
                tool: spec.id.code().to_string(),
                parameter: parameter.name.to_string(),
                expected: parameter.kind,
            };

            match parameter.kind {
                ParamKind::Text => {
                    let text = value.as_str().ok_or_else(mismatch)?;
                    arguments.text.insert(parameter.name, text.to_string());
                }
                ParamKind::Number => {
                    let number = parse_number(value).ok_or_else(mismatch)?;
                    arguments.numbers.insert(parameter.name, number);
                }
            }
        }

        Ok(arguments)
    }

    fn text(&self, name: &str) -> String {
        self.text.get(name).cloned().unwrap_or_default()
    }

    fn number(&self, name: &str) -> Decimal {
        self.numbers.get(name).copied().unwrap_or_default()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn parse_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(Decimal::from(integer)),
            None => number.as_f64().and_then(|float| Decimal::try_from(float).ok()),
        },
        Value::String(text) => {
            let text = text.trim();
            text.parse::<Decimal>().ok().or_else(|| Decimal::from_scientific(text).ok())
        }
        _ => None,
    }
}

/// The ten backend tools behind one validating executor. Holds no per-call state.
#[derive(Clone)]
pub struct ToolRegistry {
    backend: Arc<dyn TelecomBackend>,
}

impl ToolRegistry {
    pub fn new(backend: Arc<dyn TelecomBackend>) -> Self {
        Self { backend }
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        ToolId::ALL.iter().map(ToolId::spec).collect()
    }

    pub fn len(&self) -> usize {
        ToolId::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs one tool. Every outcome, including unknown tools and validation failures, comes
    /// back as a [`ToolExecutionResult`].
    pub async fn execute(
        &self,
        tool_code: &str,
        parameters: &Map<String, Value>,
        user_id: &str,
    ) -> ToolExecutionResult {
        let Some(tool) = ToolId::from_code(tool_code) else {
            let error = AgentError::ToolNotFound { tool: tool_code.to_string() };
            warn!(event_name = "agent.tool.not_found", tool = tool_code, error = %error, "unknown tool");
            return ToolExecutionResult::failed(tool_code, error.user_message());
        };

        let mut parameters = parameters.clone();
        if !parameters.contains_key("user_id") {
            parameters.insert("user_id".to_string(), Value::String(user_id.to_string()));
        }

        let call = match ToolCall::parse(tool, &parameters) {
            Ok(call) => call,
            Err(error) => {
                info!(
                    event_name = "agent.tool.rejected",
                    tool = tool.code(),
                    error_class = error.class(),
                    error = %error,
                    "tool parameters failed validation"
                );
                return ToolExecutionResult::failed(tool.code(), error.user_message());
            }
        };

        info!(event_name = "agent.tool.invoked", tool = tool.code(), "invoking tool");
        match self.run(&call).await {
            Ok(payload) => ToolExecutionResult::succeeded(tool.code(), payload),
            Err(source) => {
                let error = AgentError::ToolExecutionFailure {
                    tool: tool.code().to_string(),
                    message: source.to_string(),
                };
                warn!(
                    event_name = "agent.tool.failed",
                    tool = tool.code(),
                    backend_code = source.code(),
                    error = %error,
                    "tool execution failed"
                );
                ToolExecutionResult::failed(tool.code(), error.user_message())
            }
        }
    }

    async fn run(&self, call: &ToolCall) -> Result<String, BackendError> {
        let backend = self.backend.as_ref();
        match call {
            ToolCall::CustomerInfo { user_id } => {
                backend.customer(user_id).await.map(|customer| format_customer(&customer))
            }
            ToolCall::BillingInfo { user_id, period } => {
                backend.billing(user_id, *period).await.map(|summary| format_billing(&summary))
            }
            ToolCall::PackageList { user_id } => {
                backend.available_packages(user_id).await.map(|offer| format_packages(&offer))
            }
            ToolCall::ChangePackage { user_id, package_id } => {
                backend.change_package(user_id, package_id).await.map(|receipt| receipt.message)
            }
            ToolCall::PasswordReset { user_id } => {
                backend.reset_password(user_id).await.map(|notice| notice.message)
            }
            ToolCall::CreateTicket { user_id, issue_type, description } => backend
                .create_ticket(user_id, issue_type, description)
                .await
                .map(|ticket| ticket.message),
            ToolCall::Payment { user_id, amount, payment_method } => backend
                .process_payment(user_id, *amount, payment_method)
                .await
                .map(|receipt| receipt.message),
            ToolCall::ContractInfo { user_id } => {
                backend.customer(user_id).await.map(|customer| format_contract(&customer))
            }
            ToolCall::ActivateService { user_id, service_type } => backend
                .activate_service(user_id, service_type)
                .await
                .map(|activation| activation.message),
            ToolCall::KnowledgeSearch { query } => backend.search_knowledge_base(query).await,
        }
    }
}

fn format_customer(customer: &CustomerProfile) -> String {
    format!(
        "Müşteri: {}, Paket: {}, Bakiye: {} TL, Durum: {}",
        customer.full_name(),
        customer.current_package,
        customer.balance,
        customer.payment_status
    )
}

fn format_billing(summary: &BillingSummary) -> String {
    let bills = summary
        .bills
        .iter()
        .map(|bill| format!("{}: {} TL ({})", bill.month, bill.amount, bill.status))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Fatura bilgileri: {bills}. Toplam: {} TL, Ödenmemiş: {} TL",
        summary.total_amount, summary.unpaid_amount
    )
}

fn format_packages(offer: &PackageOffer) -> String {
    let packages = offer
        .packages
        .iter()
        .map(|package| format!("{} ({} TL)", package.name, package.price))
        .collect::<Vec<_>>()
        .join(", ");
    let mut text = format!("Mevcut paketler: {packages}");

    if !offer.recommendations.is_empty() {
        let recommendations = offer
            .recommendations
            .iter()
            .take(SHOWN_RECOMMENDATIONS)
            .map(|item| format!("{} ({})", item.package.name, item.reason.label()))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(". Öneriler: {recommendations}"));
    }
    text
}

fn format_contract(customer: &CustomerProfile) -> String {
    format!(
        "Sözleşme bitiş tarihi: {}, Müşteri olma tarihi: {}",
        customer.contract_end_date, customer.customer_since
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::{json, Map, Value};

    use callcenter_core::backend::MockTelecomBackend;
    use callcenter_core::domain::tool::ToolId;
    use callcenter_core::errors::{TOOL_FAILURE_MESSAGE, TOOL_NOT_FOUND_MESSAGE};

    use super::{ToolCall, ToolRegistry};

    fn registry() -> ToolRegistry {
        let today = NaiveDate::from_ymd_opt(2025, 7, 20).expect("valid date");
        ToolRegistry::new(Arc::new(MockTelecomBackend::new().with_today(today)))
    }

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn registry_exposes_exactly_ten_tools() {
        let registry = registry();
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.specs().len(), 10);
        assert!(!registry.is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_fails_with_its_own_name() {
        let result = registry().execute("hava_durumu", &Map::new(), "05551234567").await;
        assert!(!result.success);
        assert_eq!(result.tool_used, "hava_durumu");
        assert_eq!(result.error.as_deref(), Some(TOOL_NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn user_id_is_injected_when_absent() {
        let result = registry().execute("musteri_bilgi_al", &Map::new(), "05551234567").await;
        assert!(result.success);
        assert_eq!(
            result.result.as_deref(),
            Some("Müşteri: Ahmet Yılmaz, Paket: Sınırsız 4G, Bakiye: 150.50 TL, Durum: Ödendi")
        );
    }

    #[tokio::test]
    async fn missing_parameter_reports_the_first_violation_in_schema_order() {
        let result = registry()
            .execute("odeme_islem", &params(json!({"amount": "abc"})), "05551234567")
            .await;
        assert!(!result.success);
        assert_eq!(result.tool_used, "odeme_islem");
        let error = result.error.expect("validation error");
        assert!(error.contains("'amount' sayısal olmalı"));

        let result = registry()
            .execute("odeme_islem", &params(json!({"amount": 100})), "05551234567")
            .await;
        assert_eq!(
            result.error.as_deref(),
            Some("Gerekli parametre eksik: 'payment_method'. Lütfen doğru ve eksiksiz bilgi giriniz. Örnek: payment_method=string")
        );
    }

    #[tokio::test]
    async fn text_parameters_must_be_strings() {
        let result = registry()
            .execute("paket_degistir", &params(json!({"new_package_id": 3})), "05551234567")
            .await;
        assert!(!result.success);
        let error = result.error.expect("validation error");
        assert!(error.contains("'new_package_id' metin olmalı"));
    }

    #[tokio::test]
    async fn blank_strings_count_as_missing() {
        let result = registry()
            .execute("fatura_bilgi_al", &params(json!({"period": "  "})), "05551234567")
            .await;
        assert!(!result.success);
        assert!(result.error.as_deref().expect("validation error").contains("'period'"));
    }

    #[tokio::test]
    async fn billing_payload_lists_each_bill_with_status() {
        let result = registry()
            .execute("fatura_bilgi_al", &params(json!({"period": "last_3_months"})), "05559876543")
            .await;
        assert_eq!(
            result.result.as_deref(),
            Some("Fatura bilgileri: Aralık 2024: 150.00 TL (Gecikmiş), Kasım 2024: 150.00 TL (Gecikmiş), Ekim 2024: 150.00 TL (Ödendi). Toplam: 450.00 TL, Ödenmemiş: 300.00 TL")
        );
    }

    #[tokio::test]
    async fn package_list_shows_at_most_two_recommendations() {
        let result = registry().execute("paket_listesi_al", &Map::new(), "05551234567").await;
        let payload = result.result.expect("package list should succeed");
        assert!(payload.starts_with("Mevcut paketler: Sınırsız 4G (250.00 TL)"));
        assert!(payload.ends_with(
            ". Öneriler: Premium 5G (Daha yüksek performans için), Ekonomik Paket (Tasarruf için)"
        ));
    }

    #[tokio::test]
    async fn backend_errors_become_a_fixed_apology() {
        let result = registry()
            .execute("paket_degistir", &params(json!({"new_package_id": "PN1"})), "05559876543")
            .await;
        assert!(!result.success);
        assert_eq!(result.tool_used, "paket_degistir");
        assert_eq!(result.error.as_deref(), Some(TOOL_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn undeclared_parameters_are_dropped() {
        let result = registry()
            .execute(
                "bilgi_tabanı_ara",
                &params(json!({"query": "5G kapsama", "debug": true})),
                "05551234567",
            )
            .await;
        assert!(result.success);
        assert_eq!(
            result.result.as_deref(),
            Some("5G hizmeti şu anda sadece belirli şehirlerde mevcuttur.")
        );
    }

    #[test]
    fn numeric_strings_parse_into_payment_amounts() {
        let call = ToolCall::parse(
            ToolId::Payment,
            &params(json!({"user_id": "u1", "amount": "75.25", "payment_method": "credit_card"})),
        );
        assert!(matches!(
            call,
            Ok(ToolCall::Payment { ref amount, .. }) if amount.to_string() == "75.25"
        ));
    }
}
