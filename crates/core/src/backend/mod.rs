pub mod mock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::telecom::{
    BillingPeriod, BillingSummary, CustomerProfile, PackageChangeReceipt, PackageOffer,
    PasswordResetNotice, PaymentReceipt, ServiceActivation, SupportTicket,
};

pub use mock::MockTelecomBackend;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("customer `{user_id}` was not found")]
    CustomerNotFound { user_id: String },
    #[error("no billing records for `{user_id}`")]
    BillingNotFound { user_id: String },
    #[error("package `{package_id}` was not found")]
    PackageNotFound { package_id: String },
    #[error("request rejected ({code}): {reason}")]
    Rejected { code: &'static str, reason: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CustomerNotFound { .. } => "CUSTOMER_NOT_FOUND",
            Self::BillingNotFound { .. } => "BILLING_NOT_FOUND",
            Self::PackageNotFound { .. } => "PACKAGE_NOT_FOUND",
            Self::Rejected { code, .. } => *code,
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Unavailable(_) => "SYSTEM_ERROR",
        }
    }
}

/// Account-side operations of the telecom operator. One typed method per backend call.
#[async_trait]
pub trait TelecomBackend: Send + Sync {
    async fn customer(&self, user_id: &str) -> Result<CustomerProfile, BackendError>;

    async fn billing(
        &self,
        user_id: &str,
        period: BillingPeriod,
    ) -> Result<BillingSummary, BackendError>;

    async fn available_packages(&self, user_id: &str) -> Result<PackageOffer, BackendError>;

    async fn change_package(
        &self,
        user_id: &str,
        package_id: &str,
    ) -> Result<PackageChangeReceipt, BackendError>;

    async fn reset_password(&self, user_id: &str) -> Result<PasswordResetNotice, BackendError>;

    async fn create_ticket(
        &self,
        user_id: &str,
        issue_type: &str,
        description: &str,
    ) -> Result<SupportTicket, BackendError>;

    async fn process_payment(
        &self,
        user_id: &str,
        amount: Decimal,
        payment_method: &str,
    ) -> Result<PaymentReceipt, BackendError>;

    async fn activate_service(
        &self,
        user_id: &str,
        service_type: &str,
    ) -> Result<ServiceActivation, BackendError>;

    async fn search_knowledge_base(&self, query: &str) -> Result<String, BackendError>;
}
