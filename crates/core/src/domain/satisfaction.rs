use serde::{Deserialize, Serialize};

/// A survey answer in the 1..=10 range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SatisfactionRating(u8);

impl SatisfactionRating {
    pub fn new(value: u8) -> Option<Self> {
        (1..=10).contains(&value).then_some(Self(value))
    }

    /// Accepts a message that is nothing but a rating, surrounding whitespace allowed.
    /// Leading zeros and signs are rejected, so `"07"` and `"+7"` are not ratings.
    pub fn parse_message(message: &str) -> Option<Self> {
        match message.trim() {
            "10" => Some(Self(10)),
            digit if digit.len() == 1 => match digit.as_bytes()[0] {
                byte @ b'1'..=b'9' => Some(Self(byte - b'0')),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn tier(&self) -> RatingTier {
        match self.0 {
            8..=10 => RatingTier::Delighted,
            6..=7 => RatingTier::Satisfied,
            _ => RatingTier::Disappointed,
        }
    }
}

impl TryFrom<u8> for SatisfactionRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} is outside 1..=10"))
    }
}

impl From<SatisfactionRating> for u8 {
    fn from(value: SatisfactionRating) -> Self {
        value.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingTier {
    Delighted,
    Satisfied,
    Disappointed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStage {
    NotOffered,
    Offered,
    Rated,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionState {
    pub rating: Option<SatisfactionRating>,
    pub survey_shown: bool,
}

impl SatisfactionState {
    pub fn stage(&self) -> SurveyStage {
        match (self.rating, self.survey_shown) {
            (Some(_), _) => SurveyStage::Rated,
            (None, true) => SurveyStage::Offered,
            (None, false) => SurveyStage::NotOffered,
        }
    }

    pub fn record(&mut self, rating: SatisfactionRating) {
        self.rating = Some(rating);
    }

    /// Marks the survey as shown; returns `true` only the first time.
    pub fn offer(&mut self) -> bool {
        !std::mem::replace(&mut self.survey_shown, true)
    }
}

#[cfg(test)]
mod tests {
    use super::{RatingTier, SatisfactionRating, SatisfactionState, SurveyStage};

    #[test]
    fn parses_whole_message_ratings_only() {
        assert_eq!(SatisfactionRating::parse_message("7").map(|r| r.value()), Some(7));
        assert_eq!(SatisfactionRating::parse_message("  10 \n").map(|r| r.value()), Some(10));
        assert_eq!(SatisfactionRating::parse_message("0"), None);
        assert_eq!(SatisfactionRating::parse_message("11"), None);
        assert_eq!(SatisfactionRating::parse_message("07"), None);
        assert_eq!(SatisfactionRating::parse_message("7 puan"), None);
        assert_eq!(SatisfactionRating::parse_message(""), None);
        assert_eq!(SatisfactionRating::parse_message("٣"), None);
    }

    #[test]
    fn tiers_follow_rating_bands() {
        let tier = |value| SatisfactionRating::new(value).map(|rating| rating.tier());
        assert_eq!(tier(10), Some(RatingTier::Delighted));
        assert_eq!(tier(8), Some(RatingTier::Delighted));
        assert_eq!(tier(7), Some(RatingTier::Satisfied));
        assert_eq!(tier(6), Some(RatingTier::Satisfied));
        assert_eq!(tier(5), Some(RatingTier::Disappointed));
        assert_eq!(tier(1), Some(RatingTier::Disappointed));
    }

    #[test]
    fn survey_moves_through_stages() {
        let mut state = SatisfactionState::default();
        assert_eq!(state.stage(), SurveyStage::NotOffered);
        assert!(state.offer());
        assert!(!state.offer());
        assert_eq!(state.stage(), SurveyStage::Offered);
        if let Some(rating) = SatisfactionRating::new(9) {
            state.record(rating);
        }
        assert_eq!(state.stage(), SurveyStage::Rated);
    }
}
