use serde::{Deserialize, Serialize};

use crate::domain::satisfaction::SatisfactionRating;

pub const MIN_SATISFACTION_SCORE: f64 = 0.0;
pub const MAX_SATISFACTION_SCORE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    ManualRating,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::ManualRating => "manual_rating",
        }
    }

    /// Labels a classifier is allowed to produce. `manual_rating` is reserved for survey answers.
    pub fn parse_classified(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub emotion: String,
    pub satisfaction_score: f64,
}

impl SentimentResult {
    /// Builds a result with the score clamped into the 0..=10 band.
    pub fn new(
        sentiment: SentimentLabel,
        confidence: f64,
        emotion: impl Into<String>,
        satisfaction_score: f64,
    ) -> Self {
        Self {
            sentiment,
            confidence: confidence.clamp(0.0, 1.0),
            emotion: emotion.into(),
            satisfaction_score: clamp_score(satisfaction_score),
        }
    }

    pub fn manual_rating(rating: SatisfactionRating) -> Self {
        Self {
            sentiment: SentimentLabel::ManualRating,
            confidence: 1.0,
            emotion: "-".to_string(),
            satisfaction_score: f64::from(rating.value()),
        }
    }

    pub fn neutral() -> Self {
        Self::new(SentimentLabel::Neutral, 0.6, "neutral", 5.0)
    }
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 5.0;
    }
    score.clamp(MIN_SATISFACTION_SCORE, MAX_SATISFACTION_SCORE)
}

#[cfg(test)]
mod tests {
    use super::{SentimentLabel, SentimentResult};
    use crate::domain::satisfaction::SatisfactionRating;

    #[test]
    fn scores_are_clamped_into_range() {
        let high = SentimentResult::new(SentimentLabel::Positive, 1.4, "happy", 14.0);
        let low = SentimentResult::new(SentimentLabel::Negative, -0.2, "angry", -3.0);
        assert_eq!(high.satisfaction_score, 10.0);
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.satisfaction_score, 0.0);
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn manual_rating_carries_the_rating_as_score() {
        let rating = SatisfactionRating::new(7).map(SentimentResult::manual_rating);
        let result = rating.expect("7 is a valid rating");
        assert_eq!(result.sentiment, SentimentLabel::ManualRating);
        assert_eq!(result.satisfaction_score, 7.0);
        assert_eq!(result.emotion, "-");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn classifier_labels_exclude_manual_rating() {
        assert_eq!(SentimentLabel::parse_classified(" Positive "), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse_classified("manual_rating"), None);
        assert_eq!(SentimentLabel::parse_classified("mixed"), None);
    }
}
