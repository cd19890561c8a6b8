use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Overdue,
}

impl PaymentStatus {
    /// Label used in customer-facing summaries. `Gecikmiş` is the overdue marker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Ödendi",
            Self::Overdue => "Gecikmiş",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub user_id: String,
    pub name: String,
    pub surname: String,
    pub current_package: String,
    pub contract_end_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub balance: Decimal,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub customer_since: NaiveDate,
    pub last_payment_date: NaiveDate,
    pub credit_limit: Decimal,
    pub active_services: Vec<String>,
}

impl CustomerProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_overdue(&self) -> bool {
        self.payment_status == PaymentStatus::Overdue
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub month: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Current,
    #[default]
    Last3Months,
    Last6Months,
    All,
}

impl BillingPeriod {
    pub const CODES: [&'static str; 4] = ["current", "last_3_months", "last_6_months", "all"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Last3Months => "last_3_months",
            Self::Last6Months => "last_6_months",
            Self::All => "all",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current" => Some(Self::Current),
            "last_3_months" => Some(Self::Last3Months),
            "last_6_months" => Some(Self::Last6Months),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Free-form periods (for example a month name) fall back to the full statement.
    pub fn parse_lossy(value: &str) -> Self {
        Self::from_code(value).unwrap_or(Self::All)
    }

    pub fn bill_limit(&self) -> Option<usize> {
        match self {
            Self::Current => Some(1),
            Self::Last3Months => Some(3),
            Self::Last6Months => Some(6),
            Self::All => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSummary {
    pub bills: Vec<Bill>,
    pub total_amount: Decimal,
    pub unpaid_amount: Decimal,
    pub bill_count: usize,
}

impl BillingSummary {
    pub fn from_bills(bills: Vec<Bill>) -> Self {
        let total_amount = bills.iter().map(|bill| bill.amount).sum();
        let unpaid_amount = bills
            .iter()
            .filter(|bill| bill.status == PaymentStatus::Overdue)
            .map(|bill| bill.amount)
            .sum();
        let bill_count = bills.len();
        Self { bills, total_amount, unpaid_amount, bill_count }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub details: String,
    pub internet_speed: String,
    pub data_limit: String,
    /// `None` means unlimited.
    pub voice_minutes: Option<u32>,
    pub sms_count: Option<u32>,
    pub contract_months: u32,
    pub activation_fee: Decimal,
    pub available_regions: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationReason {
    HigherPerformance,
    Savings,
}

impl RecommendationReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HigherPerformance => "Daha yüksek performans için",
            Self::Savings => "Tasarruf için",
        }
    }

    pub fn priority(&self) -> &'static str {
        match self {
            Self::HigherPerformance => "medium",
            Self::Savings => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecommendation {
    pub package: Package,
    pub reason: RecommendationReason,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOffer {
    pub packages: Vec<Package>,
    pub current_package: String,
    pub recommendations: Vec<PackageRecommendation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageChangeReceipt {
    pub change_id: String,
    pub old_package: String,
    pub new_package: Package,
    pub requested_at: DateTime<Utc>,
    pub activation_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub new_balance: Decimal,
    pub paid_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    High,
    Medium,
    Low,
}

impl TicketPriority {
    pub fn for_issue_type(issue_type: &str) -> Self {
        match issue_type {
            "internet_outage" | "no_service" | "billing_error" => Self::High,
            "slow_internet" | "package_change" | "technical_issue" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "Yüksek",
            Self::Medium => "Orta",
            Self::Low => "Düşük",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub ticket_id: String,
    pub user_id: String,
    pub issue_type: String,
    pub description: String,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub estimated_resolution: DateTime<Utc>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetNotice {
    pub email: String,
    pub reset_link: String,
    pub expires_in: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceActivation {
    pub service_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{Bill, BillingPeriod, BillingSummary, PaymentStatus, TicketPriority};

    fn bill(month: &str, amount: i64, status: PaymentStatus) -> Bill {
        Bill {
            month: month.to_string(),
            amount: Decimal::new(amount, 0),
            due_date: NaiveDate::from_ymd_opt(2024, 12, 15).expect("valid date"),
            status,
            paid_date: None,
        }
    }

    #[test]
    fn billing_summary_totals_and_unpaid_amounts() {
        let summary = BillingSummary::from_bills(vec![
            bill("Aralık 2024", 150, PaymentStatus::Overdue),
            bill("Kasım 2024", 150, PaymentStatus::Overdue),
            bill("Ekim 2024", 150, PaymentStatus::Paid),
        ]);
        assert_eq!(summary.total_amount, Decimal::new(450, 0));
        assert_eq!(summary.unpaid_amount, Decimal::new(300, 0));
        assert_eq!(summary.bill_count, 3);
    }

    #[test]
    fn billing_period_parsing_is_lossy_towards_all() {
        assert_eq!(BillingPeriod::parse_lossy("current"), BillingPeriod::Current);
        assert_eq!(BillingPeriod::parse_lossy("LAST_6_MONTHS"), BillingPeriod::Last6Months);
        assert_eq!(BillingPeriod::parse_lossy("Temmuz"), BillingPeriod::All);
        assert_eq!(BillingPeriod::from_code("Temmuz"), None);
        assert_eq!(BillingPeriod::default().bill_limit(), Some(3));
    }

    #[test]
    fn ticket_priority_follows_issue_type() {
        assert_eq!(TicketPriority::for_issue_type("no_service"), TicketPriority::High);
        assert_eq!(TicketPriority::for_issue_type("slow_internet"), TicketPriority::Medium);
        assert_eq!(TicketPriority::for_issue_type("other").label(), "Düşük");
    }
}
