//! Fixed customer-facing texts and the selector that picks among interchangeable ones.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use callcenter_core::domain::satisfaction::RatingTier;

pub const TRAILER: &str = "\n\nBaşka bir isteğiniz var mı?";

pub const SURVEY_PROMPT: &str = "Birkaç dakika ayırıp hizmetimizi 10 puan üzerinden değerlendirir misiniz? (1-10 arası bir sayı yazın)";

pub const CLARIFICATION_QUESTION: &str = "Hangi ayın faturasını öğrenmek istiyorsunuz? Örnek: Temmuz";

pub const AUTO_PAY_OFFER: &str = "\n\nDilerseniz otomatik ödeme talimatı vermek ister misiniz?";

pub const THANKS_REPLIES: &[&str] = &[
    "Rica ederim, size yardımcı olmaktan memnuniyet duydum.",
    "Ne demek, her zaman hizmetinizdeyiz.",
    "Yardımcı olabildiysem ne mutlu bana. Başka bir konuda destek gerekirse çekinmeden yazabilirsiniz.",
    "Teşekkür ederim, size en iyi hizmeti sunmaya devam edeceğiz.",
];

pub const CLOSING_REPLIES: &[&str] = &[
    "Size yardımcı olmaktan memnuniyet duydum. İyi günler dilerim.",
    "Görüşmek üzere, sağlıklı günler dilerim.",
    "Size hizmet vermekten mutluluk duydum. Hoşça kalın.",
    "İyi günler, tekrar görüşmek dileğiyle.",
];

pub const OUT_OF_DOMAIN_REPLIES: &[&str] = &[
    "Ben bir telekom asistanıyım, sadece telekomünikasyon işlemleriyle ilgili yardımcı olabilirim. Fatura, paket, internet, ödeme gibi konularda sorularınızı beklerim.",
    "Size ancak telekom hizmetleriyle ilgili konularda yardımcı olabilirim. Fatura, paket, internet, ödeme veya sözleşme gibi sorularınız varsa memnuniyetle yanıtlarım.",
    "Yalnızca telekomünikasyon işlemleriyle ilgili destek verebiliyorum. Fatura, paket, internet, ödeme ve sözleşme konularında yardımcı olabilirim.",
    "Benim uzmanlık alanım telekom hizmetleri. Fatura, paket, internet, ödeme veya sözleşme hakkında sorularınızı yanıtlayabilirim.",
    "Telekomünikasyon dışında bir konuda yardımcı olamıyorum. Fatura, paket, internet, ödeme ve sözleşme gibi işlemler için buradayım.",
];

pub fn rating_reply(tier: RatingTier) -> &'static str {
    match tier {
        RatingTier::Delighted => {
            "Çok teşekkür ederiz! Memnuniyetiniz bizi mutlu ediyor. Size en iyi hizmeti sunmaya devam edeceğiz. İyi günler dileriz."
        }
        RatingTier::Satisfied => {
            "Teşekkür ederiz! Görüşleriniz bizim için değerli. Daha iyi hizmet vermek için sürekli çalışıyoruz. İyi günler dileriz."
        }
        RatingTier::Disappointed => {
            "Görüşleriniz için teşekkür ederiz. Daha iyi hizmet vermek için çalışacağız. İyi günler dileriz."
        }
    }
}

/// Chooses one of several interchangeable replies.
pub trait PhraseSelector: Send + Sync {
    /// Index in `0..len`; `len` is never zero for the built-in lists.
    fn index(&self, len: usize) -> usize;

    fn pick(&self, phrases: &'static [&'static str]) -> &'static str {
        if phrases.is_empty() {
            return "";
        }
        let index = self.index(phrases.len()) % phrases.len();
        phrases[index]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSelector;

impl PhraseSelector for RandomSelector {
    fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible selection from a fixed seed.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl PhraseSelector for SeededSelector {
    fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len)
    }
}

/// Always the same position; wraps around shorter lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedSelector(pub usize);

impl PhraseSelector for FixedSelector {
    fn index(&self, _len: usize) -> usize {
        self.0
    }
}
