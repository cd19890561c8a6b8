use serde::{Deserialize, Serialize};

const CUSTOMER_INFO_PARAMS: &[ParamSpec] = &[ParamSpec::text("user_id")];
const BILLING_INFO_PARAMS: &[ParamSpec] =
    &[ParamSpec::text("user_id"), ParamSpec::text("period")];
const PACKAGE_LIST_PARAMS: &[ParamSpec] = &[ParamSpec::text("user_id")];
const CHANGE_PACKAGE_PARAMS: &[ParamSpec] =
    &[ParamSpec::text("user_id"), ParamSpec::text("new_package_id")];
const PASSWORD_RESET_PARAMS: &[ParamSpec] = &[ParamSpec::text("user_id")];
const CREATE_TICKET_PARAMS: &[ParamSpec] = &[
    ParamSpec::text("user_id"),
    ParamSpec::text("issue_type"),
    ParamSpec::text("description"),
];
const PAYMENT_PARAMS: &[ParamSpec] = &[
    ParamSpec::text("user_id"),
    ParamSpec::number("amount"),
    ParamSpec::text("payment_method"),
];
const CONTRACT_INFO_PARAMS: &[ParamSpec] = &[ParamSpec::text("user_id")];
const ACTIVATE_SERVICE_PARAMS: &[ParamSpec] =
    &[ParamSpec::text("user_id"), ParamSpec::text("service_type")];
const KNOWLEDGE_SEARCH_PARAMS: &[ParamSpec] = &[ParamSpec::text("query")];

/// Backend operations the dialogue engine may invoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ToolId {
    CustomerInfo,
    BillingInfo,
    PackageList,
    ChangePackage,
    PasswordReset,
    CreateTicket,
    Payment,
    ContractInfo,
    ActivateService,
    KnowledgeSearch,
}

impl ToolId {
    pub const ALL: [ToolId; 10] = [
        ToolId::CustomerInfo,
        ToolId::BillingInfo,
        ToolId::PackageList,
        ToolId::ChangePackage,
        ToolId::PasswordReset,
        ToolId::CreateTicket,
        ToolId::Payment,
        ToolId::ContractInfo,
        ToolId::ActivateService,
        ToolId::KnowledgeSearch,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::CustomerInfo => "musteri_bilgi_al",
            Self::BillingInfo => "fatura_bilgi_al",
            Self::PackageList => "paket_listesi_al",
            Self::ChangePackage => "paket_degistir",
            Self::PasswordReset => "sifre_sifirla",
            Self::CreateTicket => "ticket_olustur",
            Self::Payment => "odeme_islem",
            Self::ContractInfo => "sozlesme_bilgi_al",
            Self::ActivateService => "hizmet_aktifleştir",
            Self::KnowledgeSearch => "bilgi_tabanı_ara",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|tool| tool.code() == code)
    }

    pub fn spec(&self) -> ToolSpec {
        match self {
            Self::CustomerInfo => ToolSpec {
                id: *self,
                display_name: "Müşteri Bilgilerini Al",
                description: "Müşterinin hesap bilgilerini, paket durumunu ve fatura geçmişini getirir",
                parameters: CUSTOMER_INFO_PARAMS,
            },
            Self::BillingInfo => ToolSpec {
                id: *self,
                display_name: "Fatura Bilgilerini Al",
                description: "Müşterinin güncel ve geçmiş faturalarını getirir",
                parameters: BILLING_INFO_PARAMS,
            },
            Self::PackageList => ToolSpec {
                id: *self,
                display_name: "Paket Listesini Al",
                description: "Müşterinin mevcut paketini ve değiştirebileceği paketleri listeler",
                parameters: PACKAGE_LIST_PARAMS,
            },
            Self::ChangePackage => ToolSpec {
                id: *self,
                display_name: "Paket Değiştir",
                description: "Müşterinin paketini değiştirir",
                parameters: CHANGE_PACKAGE_PARAMS,
            },
            Self::PasswordReset => ToolSpec {
                id: *self,
                display_name: "Şifre Sıfırla",
                description: "Müşterinin şifresini sıfırlar ve e-posta gönderir",
                parameters: PASSWORD_RESET_PARAMS,
            },
            Self::CreateTicket => ToolSpec {
                id: *self,
                display_name: "Destek Talebi Oluştur",
                description: "Teknik destek talebi oluşturur",
                parameters: CREATE_TICKET_PARAMS,
            },
            Self::Payment => ToolSpec {
                id: *self,
                display_name: "Ödeme İşlemi",
                description: "Fatura ödemesi işlemi yapar",
                parameters: PAYMENT_PARAMS,
            },
            Self::ContractInfo => ToolSpec {
                id: *self,
                display_name: "Sözleşme Bilgilerini Al",
                description: "Müşterinin sözleşme detaylarını getirir",
                parameters: CONTRACT_INFO_PARAMS,
            },
            Self::ActivateService => ToolSpec {
                id: *self,
                display_name: "Hizmet Aktifleştir",
                description: "Yeni hizmet aktifleştirir",
                parameters: ACTIVATE_SERVICE_PARAMS,
            },
            Self::KnowledgeSearch => ToolSpec {
                id: *self,
                display_name: "Bilgi Tabanında Ara",
                description: "Genel sorular için bilgi tabanında arama yapar",
                parameters: KNOWLEDGE_SEARCH_PARAMS,
            },
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for ToolId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value).ok_or_else(|| format!("unknown tool `{value}`"))
    }
}

impl From<ToolId> for String {
    fn from(value: ToolId) -> Self {
        value.code().to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Text,
    Number,
}

impl ParamKind {
    /// Type hint shown to customers in "missing parameter" messages.
    pub fn example_hint(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "float",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Number => f.write_str("numeric"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Text }
    }

    pub const fn number(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Number }
    }
}

/// Declared schema for a tool. Parameter order is the validation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolSpec {
    pub id: ToolId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParamSpec],
}

impl ToolSpec {
    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|parameter| parameter.name == name)
    }
}

/// Outcome of one tool invocation. Failures are data, never errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub tool_used: String,
}

impl ToolExecutionResult {
    pub fn succeeded(tool_used: impl Into<String>, result: impl Into<String>) -> Self {
        Self { success: true, result: Some(result.into()), error: None, tool_used: tool_used.into() }
    }

    pub fn failed(tool_used: impl Into<String>, error: impl Into<String>) -> Self {
        Self { success: false, result: None, error: Some(error.into()), tool_used: tool_used.into() }
    }

    pub fn is_success_of(&self, tool: ToolId) -> bool {
        self.success && self.tool_used == tool.code()
    }

    pub fn payload(&self) -> Option<&str> {
        if self.success {
            self.result.as_deref().filter(|text| !text.is_empty())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{ParamKind, ToolExecutionResult, ToolId};

    #[test]
    fn registry_codes_are_unique_and_complete() {
        let codes: HashSet<&str> = ToolId::ALL.iter().map(|tool| tool.code()).collect();
        assert_eq!(codes.len(), 10);
        for tool in ToolId::ALL {
            assert_eq!(ToolId::from_code(tool.code()), Some(tool));
            assert_eq!(tool.spec().id, tool);
        }
    }

    #[test]
    fn payment_schema_declares_numeric_amount_in_order() {
        let spec = ToolId::Payment.spec();
        let names: Vec<&str> = spec.parameters.iter().map(|parameter| parameter.name).collect();
        assert_eq!(names, vec!["user_id", "amount", "payment_method"]);
        assert_eq!(spec.parameters[1].kind, ParamKind::Number);
        assert!(spec.declares("payment_method"));
        assert!(!spec.declares("period"));
    }

    #[test]
    fn knowledge_search_is_the_only_tool_without_user_id() {
        let without_user: Vec<ToolId> =
            ToolId::ALL.into_iter().filter(|tool| !tool.spec().declares("user_id")).collect();
        assert_eq!(without_user, vec![ToolId::KnowledgeSearch]);
    }

    #[test]
    fn payload_is_only_exposed_for_successes() {
        let ok = ToolExecutionResult::succeeded("fatura_bilgi_al", "Fatura bilgileri: -");
        let failed = ToolExecutionResult::failed("fatura_bilgi_al", "hata");
        assert_eq!(ok.payload(), Some("Fatura bilgileri: -"));
        assert!(ok.is_success_of(ToolId::BillingInfo));
        assert_eq!(failed.payload(), None);
        assert!(!failed.is_success_of(ToolId::BillingInfo));
    }
}
