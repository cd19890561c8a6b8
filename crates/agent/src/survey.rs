use callcenter_core::domain::satisfaction::{SatisfactionRating, SatisfactionState};

use crate::replies::{
    rating_reply, PhraseSelector, CLOSING_REPLIES, SURVEY_PROMPT, THANKS_REPLIES,
};
use crate::text::{contains_any, fold_case};

pub const CLOSING_PHRASES: &[&str] = &[
    "başka bir isteğim yok",
    "başka bir sorum yok",
    "yok teşekkürler",
    "hepsi bu",
    "bu kadar",
    "hoşcakal",
    "hoşça kal",
    "görüşürüz",
    "bye",
    "güle güle",
    "elveda",
    "selametle",
    "kendine iyi bak",
    "hayır teşekkürler",
    "hayır sağol",
    "hayır sağ olun",
];

pub const THANKS_PHRASES: &[&str] = &["teşekkür", "sağ ol", "eyvallah"];

/// Messages that end the turn before intent resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurveyTrigger {
    Rating(SatisfactionRating),
    Closing,
    Thanks,
}

impl SurveyTrigger {
    /// First match wins: a bare rating, then a closing phrase, then thanks.
    pub fn detect(message: &str) -> Option<Self> {
        if let Some(rating) = SatisfactionRating::parse_message(message) {
            return Some(Self::Rating(rating));
        }

        let normalized = fold_case(message);
        if contains_any(&normalized, CLOSING_PHRASES) {
            Some(Self::Closing)
        } else if contains_any(&normalized, THANKS_PHRASES) {
            Some(Self::Thanks)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rating(_) => "rating",
            Self::Closing => "closing",
            Self::Thanks => "thanks",
        }
    }
}

/// Advances the survey for `trigger` and returns the reply. A rating never changes
/// whether the survey was shown.
pub fn respond(
    trigger: SurveyTrigger,
    state: &mut SatisfactionState,
    selector: &dyn PhraseSelector,
) -> &'static str {
    match trigger {
        SurveyTrigger::Rating(rating) => {
            state.record(rating);
            rating_reply(rating.tier())
        }
        SurveyTrigger::Closing if state.offer() => SURVEY_PROMPT,
        SurveyTrigger::Closing => selector.pick(CLOSING_REPLIES),
        SurveyTrigger::Thanks => selector.pick(THANKS_REPLIES),
    }
}

#[cfg(test)]
mod tests {
    use callcenter_core::domain::satisfaction::{SatisfactionState, SurveyStage};

    use super::{respond, SurveyTrigger};
    use crate::replies::{FixedSelector, CLOSING_REPLIES, SURVEY_PROMPT, THANKS_REPLIES};

    #[test]
    fn closing_takes_precedence_over_thanks() {
        assert_eq!(
            SurveyTrigger::detect("Teşekkürler, başka bir isteğim yok"),
            Some(SurveyTrigger::Closing)
        );
        assert_eq!(SurveyTrigger::detect("Çok teşekkür ederim"), Some(SurveyTrigger::Thanks));
        assert_eq!(SurveyTrigger::detect("BYE"), Some(SurveyTrigger::Closing));
        assert_eq!(SurveyTrigger::detect("Faturamı öğrenmek istiyorum"), None);
    }

    #[test]
    fn only_bare_numbers_are_ratings() {
        assert!(matches!(SurveyTrigger::detect(" 9 "), Some(SurveyTrigger::Rating(r)) if r.value() == 9));
        assert_eq!(SurveyTrigger::detect("11"), None);
        assert_eq!(SurveyTrigger::detect("0"), None);
        assert_eq!(SurveyTrigger::detect("7 puan"), None);
    }

    #[test]
    fn survey_is_offered_once_then_closing_remarks_follow() {
        let mut state = SatisfactionState::default();
        let selector = FixedSelector(2);

        assert_eq!(respond(SurveyTrigger::Closing, &mut state, &selector), SURVEY_PROMPT);
        assert_eq!(state.stage(), SurveyStage::Offered);
        assert_eq!(respond(SurveyTrigger::Closing, &mut state, &selector), CLOSING_REPLIES[2]);
        assert_eq!(respond(SurveyTrigger::Thanks, &mut state, &selector), THANKS_REPLIES[2]);
    }

    #[test]
    fn rating_records_without_touching_the_survey_flag() {
        let mut state = SatisfactionState::default();
        let Some(trigger) = SurveyTrigger::detect("7") else {
            panic!("7 should be a rating");
        };

        let reply = respond(trigger, &mut state, &FixedSelector(0));

        assert!(reply.starts_with("Teşekkür ederiz!"));
        assert_eq!(state.rating.map(|rating| rating.value()), Some(7));
        assert!(!state.survey_shown);
        assert_eq!(state.stage(), SurveyStage::Rated);
    }
}
