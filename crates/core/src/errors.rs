use thiserror::Error;

use crate::domain::tool::ParamKind;

pub const TOOL_NOT_FOUND_MESSAGE: &str = "İlgili işlem için gerekli araç sistemde tanımlı değil. Lütfen tekrar deneyin veya destek ekibiyle iletişime geçin.";
pub const TOOL_FAILURE_MESSAGE: &str = "Üzgünüz, işleminiz sırasında bir hata oluştu. Lütfen bilgilerinizi kontrol ederek tekrar deneyin. Sorun devam ederse, farklı bir işlem deneyebilir veya destek ekibimizle iletişime geçebilirsiniz.";
pub const CUSTOMER_LOOKUP_MESSAGE: &str = "Üzgünüz, müşteri bilgilerinize erişimde bir sorun yaşadık. Lütfen müşteri numaranızı kontrol ederek tekrar deneyin. Sorun devam ederse, destek ekibimizle iletişime geçebilirsiniz.";
pub const SYSTEM_ERROR_MESSAGE: &str = "Sistemde geçici bir sorun oluştu. Lütfen daha sonra tekrar deneyin veya destek ekibimizle iletişime geçin.";
pub const LANGUAGE_MODEL_FAILURE_MESSAGE: &str =
    "Üzgünüm, şu anda size yardımcı olamıyorum. Lütfen daha sonra tekrar deneyin.";

/// Failures inside the dialogue engine. None of these reach a customer as-is; each one
/// maps to a fixed Turkish message through [`AgentError::user_message`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("tool `{tool}` is not registered")]
    ToolNotFound { tool: String },
    #[error("tool `{tool}` is missing required parameter `{parameter}`")]
    MissingParameter { tool: String, parameter: String, kind: ParamKind },
    #[error("tool `{tool}` parameter `{parameter}` must be {expected}")]
    TypeMismatch { tool: String, parameter: String, expected: ParamKind },
    #[error("tool `{tool}` failed: {message}")]
    ToolExecutionFailure { tool: String, message: String },
    #[error("language model unavailable: {0}")]
    LanguageModelUnavailable(String),
    #[error("language model returned malformed output: {0}")]
    LanguageModelMalformedOutput(String),
    #[error("customer lookup failed for `{user_id}`")]
    CustomerLookupFailure { user_id: String },
    #[error("system failure: {0}")]
    System(String),
}

impl AgentError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ToolExecutionFailure { .. } => "tool_execution_failure",
            Self::LanguageModelUnavailable(_) => "language_model_unavailable",
            Self::LanguageModelMalformedOutput(_) => "language_model_malformed_output",
            Self::CustomerLookupFailure { .. } => "customer_lookup_failure",
            Self::System(_) => "system_error",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ToolNotFound { .. } => TOOL_NOT_FOUND_MESSAGE.to_string(),
            Self::MissingParameter { parameter, kind, .. } => format!(
                "Gerekli parametre eksik: '{parameter}'. Lütfen doğru ve eksiksiz bilgi giriniz. Örnek: {parameter}={}",
                kind.example_hint()
            ),
            Self::TypeMismatch { parameter, expected: ParamKind::Number, .. } => format!(
                "Parametre tipi hatalı: '{parameter}' sayısal olmalı. Örnek: {parameter}=100.0"
            ),
            Self::TypeMismatch { parameter, expected: ParamKind::Text, .. } => format!(
                "Parametre tipi hatalı: '{parameter}' metin olmalı. Örnek: {parameter}='değer'"
            ),
            Self::ToolExecutionFailure { .. } => TOOL_FAILURE_MESSAGE.to_string(),
            Self::LanguageModelUnavailable(_) | Self::LanguageModelMalformedOutput(_) => {
                LANGUAGE_MODEL_FAILURE_MESSAGE.to_string()
            }
            Self::CustomerLookupFailure { .. } => CUSTOMER_LOOKUP_MESSAGE.to_string(),
            Self::System(_) => SYSTEM_ERROR_MESSAGE.to_string(),
        }
    }
}
