use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{BackendError, TelecomBackend};
use crate::domain::telecom::{
    Bill, BillingPeriod, BillingSummary, CustomerProfile, Package, PackageChangeReceipt,
    PackageOffer, PackageRecommendation, PasswordResetNotice, PaymentReceipt, PaymentStatus,
    RecommendationReason, ServiceActivation, SupportTicket, TicketPriority,
};

const NATIONWIDE: &str = "Tüm Türkiye";
const BLOCKED_CUSTOMER_ID: &str = "00000000000";
const OVERDUE_PRICE_CEILING: i64 = 200;
const MAX_RECOMMENDATIONS: usize = 3;
const CONTRACT_CHANGE_WINDOW_DAYS: i64 = 30;
const FIRST_TICKET_NUMBER: u32 = 1000;

const KNOWLEDGE_BASE: [(&str, &str); 6] = [
    ("internet", "İnternet hızınızı artırmak için router'ınızı yeniden başlatabilirsiniz."),
    ("fatura", "Faturalarınızı online olarak ödeyebilir veya banka şubelerinden yatırabilirsiniz."),
    ("paket", "Paket değişikliği için müşteri hizmetlerimizi arayabilirsiniz."),
    ("şifre", "Şifrenizi unuttuysanız, web sitemizden sıfırlayabilirsiniz."),
    ("5g", "5G hizmeti şu anda sadece belirli şehirlerde mevcuttur."),
    ("tv", "Dijital TV hizmetimiz için özel bir set-top box gereklidir."),
];

struct MockState {
    customers: HashMap<String, CustomerProfile>,
    bills: HashMap<String, Vec<Bill>>,
    pending_changes: HashMap<String, PackageChangeReceipt>,
    tickets: HashMap<String, SupportTicket>,
    ticket_counter: u32,
}

/// In-process telecom backend seeded with three demo subscribers and the five-package catalog.
pub struct MockTelecomBackend {
    packages: Vec<Package>,
    state: RwLock<MockState>,
    today: Option<NaiveDate>,
}

impl Default for MockTelecomBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTelecomBackend {
    pub fn new() -> Self {
        let customers = seed_customers()
            .into_iter()
            .map(|customer| (customer.user_id.clone(), customer))
            .collect();

        Self {
            packages: seed_packages(),
            state: RwLock::new(MockState {
                customers,
                bills: seed_bills(),
                pending_changes: HashMap::new(),
                tickets: HashMap::new(),
                ticket_counter: FIRST_TICKET_NUMBER,
            }),
            today: None,
        }
    }

    /// Pins the calendar date used for contract checks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub async fn pending_change_count(&self) -> usize {
        self.state.read().await.pending_changes.len()
    }

    pub async fn ticket(&self, ticket_id: &str) -> Option<SupportTicket> {
        self.state.read().await.tickets.get(ticket_id).cloned()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn package_by_id(&self, package_id: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.id == package_id)
    }

    fn package_price(&self, name: &str) -> Decimal {
        self.packages
            .iter()
            .find(|package| package.name == name)
            .map(|package| package.price)
            .unwrap_or(Decimal::ZERO)
    }

    fn recommendations(
        &self,
        customer: &CustomerProfile,
        available: &[Package],
    ) -> Vec<PackageRecommendation> {
        let current_price = self.package_price(&customer.current_package);
        let upper = current_price * Decimal::new(12, 1);
        let lower = current_price * Decimal::new(8, 1);

        available
            .iter()
            .filter(|package| package.name != customer.current_package)
            .filter_map(|package| {
                let reason = if package.price > upper {
                    RecommendationReason::HigherPerformance
                } else if package.price < lower {
                    RecommendationReason::Savings
                } else {
                    return None;
                };
                Some(PackageRecommendation { package: package.clone(), reason })
            })
            .take(MAX_RECOMMENDATIONS)
            .collect()
    }

    fn validate_change(
        &self,
        customer: &CustomerProfile,
        package: &Package,
    ) -> Result<(), BackendError> {
        if customer.is_overdue() {
            return Err(BackendError::Rejected {
                code: "OUTSTANDING_PAYMENT",
                reason: "Gecikmiş ödemeniz nedeniyle paket değişikliği yapılamıyor.".to_string(),
            });
        }

        if customer.contract_end_date > self.today() + Duration::days(CONTRACT_CHANGE_WINDOW_DAYS)
        {
            return Err(BackendError::Rejected {
                code: "CONTRACT_NOT_EXPIRED",
                reason: "Sözleşmeniz henüz bitmemiş. Paket değişikliği için 30 gün beklemelisiniz."
                    .to_string(),
            });
        }

        if package.price > customer.credit_limit {
            return Err(BackendError::Rejected {
                code: "INSUFFICIENT_CREDIT",
                reason: "Kredi limitiniz yeni paket için yeterli değil.".to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl TelecomBackend for MockTelecomBackend {
    async fn customer(&self, user_id: &str) -> Result<CustomerProfile, BackendError> {
        if user_id == BLOCKED_CUSTOMER_ID {
            return Err(not_found(user_id));
        }
        let state = self.state.read().await;
        state.customers.get(user_id).cloned().ok_or_else(|| not_found(user_id))
    }

    async fn billing(
        &self,
        user_id: &str,
        period: BillingPeriod,
    ) -> Result<BillingSummary, BackendError> {
        let state = self.state.read().await;
        let bills = state
            .bills
            .get(user_id)
            .ok_or_else(|| BackendError::BillingNotFound { user_id: user_id.to_string() })?;

        let selected = match period.bill_limit() {
            Some(limit) => bills.iter().take(limit).cloned().collect(),
            None => bills.clone(),
        };
        Ok(BillingSummary::from_bills(selected))
    }

    async fn available_packages(&self, user_id: &str) -> Result<PackageOffer, BackendError> {
        let state = self.state.read().await;
        let customer = state.customers.get(user_id).ok_or_else(|| not_found(user_id))?;
        let region = region_from_address(&customer.address);
        let ceiling = Decimal::new(OVERDUE_PRICE_CEILING, 0);

        let packages: Vec<Package> = self
            .packages
            .iter()
            .filter(|package| !(customer.is_overdue() && package.price > ceiling))
            .filter(|package| {
                package.available_regions.iter().any(|name| name == region || name == NATIONWIDE)
            })
            .cloned()
            .collect();

        let recommendations = self.recommendations(customer, &packages);
        Ok(PackageOffer {
            packages,
            current_package: customer.current_package.clone(),
            recommendations,
        })
    }

    async fn change_package(
        &self,
        user_id: &str,
        package_id: &str,
    ) -> Result<PackageChangeReceipt, BackendError> {
        let mut state = self.state.write().await;
        let customer = state.customers.get(user_id).ok_or_else(|| not_found(user_id))?;
        let package = self
            .package_by_id(package_id)
            .ok_or_else(|| BackendError::PackageNotFound { package_id: package_id.to_string() })?;

        self.validate_change(customer, package)?;

        let now = Utc::now();
        let change_id = format!("CHG-{}-{}", now.timestamp(), state.pending_changes.len() + 1);
        let receipt = PackageChangeReceipt {
            change_id: change_id.clone(),
            old_package: customer.current_package.clone(),
            new_package: package.clone(),
            requested_at: now,
            activation_at: now + Duration::hours(24),
            message: "Paket değişikliği talebiniz alınmıştır. 24 saat içinde aktifleşecektir."
                .to_string(),
        };
        state.pending_changes.insert(change_id, receipt.clone());
        Ok(receipt)
    }

    async fn reset_password(&self, user_id: &str) -> Result<PasswordResetNotice, BackendError> {
        let state = self.state.read().await;
        let customer = state.customers.get(user_id).ok_or_else(|| not_found(user_id))?;
        let token = format!("RESET-{}", Utc::now().timestamp());

        Ok(PasswordResetNotice {
            email: customer.email.clone(),
            reset_link: format!("https://selfcare.telekom.com/reset-password?token={token}"),
            expires_in: "24 saat".to_string(),
            message: "Şifre sıfırlama bağlantısı e-posta adresinize gönderildi.".to_string(),
        })
    }

    async fn create_ticket(
        &self,
        user_id: &str,
        issue_type: &str,
        description: &str,
    ) -> Result<SupportTicket, BackendError> {
        let mut state = self.state.write().await;
        if !state.customers.contains_key(user_id) {
            return Err(not_found(user_id));
        }

        state.ticket_counter += 1;
        let ticket_id = format!("TKT-{}", state.ticket_counter);
        let created_at = Utc::now();
        let ticket = SupportTicket {
            ticket_id: ticket_id.clone(),
            user_id: user_id.to_string(),
            issue_type: issue_type.to_string(),
            description: description.to_string(),
            priority: TicketPriority::for_issue_type(issue_type),
            created_at,
            estimated_resolution: created_at + Duration::days(2),
            message: format!("Destek talebiniz oluşturuldu. Talep numarası: {ticket_id}"),
        };
        state.tickets.insert(ticket_id, ticket.clone());
        Ok(ticket)
    }

    async fn process_payment(
        &self,
        user_id: &str,
        amount: Decimal,
        payment_method: &str,
    ) -> Result<PaymentReceipt, BackendError> {
        if amount <= Decimal::ZERO {
            return Err(BackendError::InvalidRequest(format!(
                "payment amount must be positive, got {amount}"
            )));
        }

        let mut state = self.state.write().await;
        let customer = state.customers.get_mut(user_id).ok_or_else(|| not_found(user_id))?;
        let paid_at = Utc::now();
        customer.balance += amount;
        customer.last_payment_date = paid_at.date_naive();

        Ok(PaymentReceipt {
            payment_id: format!("PAY-{}", paid_at.timestamp()),
            amount,
            payment_method: payment_method.to_string(),
            new_balance: customer.balance,
            paid_at,
            message: format!("{amount} TL ödeme {payment_method} ile başarıyla işleme alındı."),
        })
    }

    async fn activate_service(
        &self,
        _user_id: &str,
        service_type: &str,
    ) -> Result<ServiceActivation, BackendError> {
        Ok(ServiceActivation {
            service_type: service_type.to_string(),
            message: format!(
                "{service_type} hizmeti başarıyla aktifleştirildi. Aktivasyon 24 saat içinde tamamlanacak."
            ),
        })
    }

    async fn search_knowledge_base(&self, query: &str) -> Result<String, BackendError> {
        let normalized = query.to_lowercase();
        let answer = KNOWLEDGE_BASE
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword))
            .map(|(_, answer)| (*answer).to_string())
            .unwrap_or_else(|| {
                format!("'{query}' ile ilgili bilgi bulundu: Bu konuda size yardımcı olabilirim.")
            });
        Ok(answer)
    }
}

fn not_found(user_id: &str) -> BackendError {
    BackendError::CustomerNotFound { user_id: user_id.to_string() }
}

fn region_from_address(address: &str) -> &'static str {
    ["İstanbul", "Ankara", "İzmir", "Bursa"]
        .into_iter()
        .find(|city| address.contains(city))
        .unwrap_or("Diğer")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn tl(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, 2)
}

fn seed_customers() -> Vec<CustomerProfile> {
    vec![
        CustomerProfile {
            user_id: "05551234567".to_string(),
            name: "Ahmet".to_string(),
            surname: "Yılmaz".to_string(),
            current_package: "Sınırsız 4G".to_string(),
            contract_end_date: date(2025, 8, 1),
            payment_status: PaymentStatus::Paid,
            balance: tl(15050),
            address: "İstanbul, Kadıköy".to_string(),
            email: "ahmet.yilmaz@email.com".to_string(),
            phone_number: "05551234567".to_string(),
            customer_since: date(2020, 3, 15),
            last_payment_date: date(2024, 12, 1),
            credit_limit: tl(50000),
            active_services: vec!["internet".into(), "mobile".into(), "tv".into()],
        },
        CustomerProfile {
            user_id: "05559876543".to_string(),
            name: "Fatma".to_string(),
            surname: "Demir".to_string(),
            current_package: "Ekonomik Paket".to_string(),
            contract_end_date: date(2024, 12, 31),
            payment_status: PaymentStatus::Overdue,
            balance: tl(-7525),
            address: "Ankara, Çankaya".to_string(),
            email: "fatma.demir@email.com".to_string(),
            phone_number: "05559876543".to_string(),
            customer_since: date(2022, 7, 20),
            last_payment_date: date(2024, 11, 1),
            credit_limit: tl(30000),
            active_services: vec!["internet".into(), "mobile".into()],
        },
        CustomerProfile {
            user_id: "05551112233".to_string(),
            name: "Mehmet".to_string(),
            surname: "Kaya".to_string(),
            current_package: "Premium 5G".to_string(),
            contract_end_date: date(2025, 6, 15),
            payment_status: PaymentStatus::Paid,
            balance: tl(0),
            address: "İzmir, Konak".to_string(),
            email: "mehmet.kaya@email.com".to_string(),
            phone_number: "05551112233".to_string(),
            customer_since: date(2019, 11, 10),
            last_payment_date: date(2024, 12, 1),
            credit_limit: tl(100000),
            active_services: vec![
                "internet".into(),
                "mobile".into(),
                "tv".into(),
                "landline".into(),
            ],
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn package(
    id: &str,
    name: &str,
    price: i64,
    details: &str,
    internet_speed: &str,
    data_limit: &str,
    voice_minutes: Option<u32>,
    sms_count: Option<u32>,
    contract_months: u32,
    activation_fee: i64,
    available_regions: &[&str],
) -> Package {
    Package {
        id: id.to_string(),
        name: name.to_string(),
        price: tl(price * 100),
        details: details.to_string(),
        internet_speed: internet_speed.to_string(),
        data_limit: data_limit.to_string(),
        voice_minutes,
        sms_count,
        contract_months,
        activation_fee: tl(activation_fee * 100),
        available_regions: available_regions.iter().map(|region| region.to_string()).collect(),
    }
}

fn seed_packages() -> Vec<Package> {
    vec![
        package(
            "PN1",
            "Sınırsız 4G",
            250,
            "Sınırsız internet, 1000 dakika konuşma, 100 SMS",
            "100Mbps",
            "Sınırsız",
            Some(1000),
            Some(100),
            12,
            0,
            &["İstanbul", "Ankara", "İzmir", "Bursa"],
        ),
        package(
            "PN2",
            "Premium 5G",
            350,
            "Sınırsız 5G internet, sınırsız konuşma, sınırsız SMS",
            "1Gbps",
            "Sınırsız",
            None,
            None,
            24,
            50,
            &["İstanbul", "Ankara", "İzmir"],
        ),
        package(
            "PN3",
            "Ekonomik Paket",
            150,
            "10GB internet, 500 dakika konuşma, 50 SMS",
            "50Mbps",
            "10GB",
            Some(500),
            Some(50),
            12,
            0,
            &[NATIONWIDE],
        ),
        package(
            "PN4",
            "Aile Paketi",
            400,
            "4 hataya sınırsız internet, sınırsız konuşma",
            "200Mbps",
            "Sınırsız",
            None,
            Some(200),
            24,
            25,
            &[NATIONWIDE],
        ),
        package(
            "PN5",
            "Öğrenci Paketi",
            120,
            "5GB internet, 300 dakika konuşma, 30 SMS",
            "25Mbps",
            "5GB",
            Some(300),
            Some(30),
            12,
            0,
            &[NATIONWIDE],
        ),
    ]
}

fn statement(amount: i64, settled: [Option<NaiveDate>; 3]) -> Vec<Bill> {
    [("Aralık 2024", 12), ("Kasım 2024", 11), ("Ekim 2024", 10)]
        .into_iter()
        .zip(settled)
        .map(|((month, month_number), paid_date)| Bill {
            month: month.to_string(),
            amount: tl(amount * 100),
            due_date: date(2024, month_number, 15),
            status: if paid_date.is_some() { PaymentStatus::Paid } else { PaymentStatus::Overdue },
            paid_date,
        })
        .collect()
}

fn seed_bills() -> HashMap<String, Vec<Bill>> {
    HashMap::from([
        (
            "05551234567".to_string(),
            statement(
                250,
                [Some(date(2024, 12, 10)), Some(date(2024, 11, 12)), Some(date(2024, 10, 14))],
            ),
        ),
        ("05559876543".to_string(), statement(150, [None, None, Some(date(2024, 10, 20))])),
        (
            "05551112233".to_string(),
            statement(
                350,
                [Some(date(2024, 12, 1)), Some(date(2024, 11, 1)), Some(date(2024, 10, 1))],
            ),
        ),
    ])
}
