use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classified purpose of a customer turn.
///
/// Wire codes are the identifiers the language model is asked to produce and are kept
/// stable across releases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Intent {
    BillingInquiry,
    PackageChange,
    PasswordReset,
    TechnicalSupport,
    Complaint,
    #[default]
    GeneralQuestion,
    CustomerInfo,
    Payment,
    ContractRenewal,
    ServiceActivation,
    ContractInfo,
}

impl Intent {
    pub const ALL: [Intent; 11] = [
        Intent::BillingInquiry,
        Intent::PackageChange,
        Intent::PasswordReset,
        Intent::TechnicalSupport,
        Intent::Complaint,
        Intent::GeneralQuestion,
        Intent::CustomerInfo,
        Intent::Payment,
        Intent::ContractRenewal,
        Intent::ServiceActivation,
        Intent::ContractInfo,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::BillingInquiry => "fatura_sorgula",
            Self::PackageChange => "paket_degistir",
            Self::PasswordReset => "sifre_sifirla",
            Self::TechnicalSupport => "teknik_destek",
            Self::Complaint => "sikayet",
            Self::GeneralQuestion => "genel_soru",
            Self::CustomerInfo => "musteri_bilgi",
            Self::Payment => "odeme",
            Self::ContractRenewal => "sozlesme_yenile",
            Self::ServiceActivation => "hizmet_aktifleştir",
            Self::ContractInfo => "sozlesme_bilgi_al",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|intent| intent.code() == code)
    }

    /// Best-effort mapping; anything unrecognized becomes `GeneralQuestion`.
    pub fn from_code_lossy(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Intent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value).ok_or_else(|| format!("unknown intent `{value}`"))
    }
}

impl From<Intent> for String {
    fn from(value: Intent) -> Self {
        value.code().to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Immediate,
    MultiStep,
    Clarification,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::MultiStep => "multi_step",
            Self::Clarification => "clarification",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    LanguageModel,
    KeywordFallback,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub intent: Intent,
    pub confidence: f64,
    pub required_tools: Vec<String>,
    pub parameters: Map<String, Value>,
    pub context_update: Map<String, Value>,
    pub response_type: ResponseType,
    pub source: AnalysisSource,
}

impl IntentAnalysis {
    /// Parameter names the plan left blank, used to phrase clarification requests.
    pub fn missing_parameters(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|(_, value)| match value {
                Value::Null => true,
                Value::String(text) => text.trim().is_empty(),
                Value::Bool(flag) => !flag,
                _ => false,
            })
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::{AnalysisSource, Intent, IntentAnalysis, ResponseType};

    #[test]
    fn every_intent_round_trips_through_its_code() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_code(intent.code()), Some(intent));
        }
    }

    #[test]
    fn unknown_codes_map_to_general_question() {
        assert_eq!(Intent::from_code("hava_durumu"), None);
        assert_eq!(Intent::from_code_lossy("hava_durumu"), Intent::GeneralQuestion);
        assert_eq!(Intent::default(), Intent::GeneralQuestion);
    }

    #[test]
    fn deserialization_rejects_unknown_intents() {
        let known: Result<Intent, _> = serde_json::from_value(json!("odeme"));
        let unknown: Result<Intent, _> = serde_json::from_value(json!("selamlama"));
        assert_eq!(known.ok(), Some(Intent::Payment));
        assert!(unknown.is_err());
    }

    #[test]
    fn missing_parameters_lists_blank_values() {
        let mut parameters = Map::new();
        parameters.insert("period".to_string(), json!(""));
        parameters.insert("amount".to_string(), json!(120.0));
        parameters.insert("payment_method".to_string(), json!(null));

        let analysis = IntentAnalysis {
            intent: Intent::Payment,
            confidence: 0.7,
            required_tools: vec!["odeme_islem".to_string()],
            parameters,
            context_update: Map::new(),
            response_type: ResponseType::Clarification,
            source: AnalysisSource::LanguageModel,
        };

        let mut missing = analysis.missing_parameters();
        missing.sort();
        assert_eq!(missing, vec!["payment_method".to_string(), "period".to_string()]);
    }
}
