//! Mood classification: compound score → discrete label.
//!
//! Thresholds are fixed and inclusive:
//! - `compound >= 0.05`  → positive
//! - `compound <= -0.05` → negative
//! - otherwise           → neutral

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Discrete mood of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Positive,
    Neutral,
    Negative,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 3] = [MoodLabel::Positive, MoodLabel::Neutral, MoodLabel::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Positive => "positive",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Negative => "negative",
        }
    }

    /// Linear label scale used for hourly means: positive = 1, neutral = 0.5,
    /// negative = 0. Unrelated to the compound scale in [-1, 1].
    pub fn label_score(&self) -> f64 {
        match self {
            MoodLabel::Positive => 1.0,
            MoodLabel::Neutral => 0.5,
            MoodLabel::Negative => 0.0,
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Ok(MoodLabel::Positive),
            "neutral" | "neu" => Ok(MoodLabel::Neutral),
            "negative" | "neg" => Ok(MoodLabel::Negative),
            _ => Err(RecordError::UnknownLabel(s.to_string())),
        }
    }
}

/// Total over every `f64`: out-of-range values are clamped, NaN is neutral.
pub fn classify(compound: f64) -> MoodLabel {
    let c = compound.clamp(-1.0, 1.0);
    if c >= POSITIVE_THRESHOLD {
        MoodLabel::Positive
    } else if c <= NEGATIVE_THRESHOLD {
        MoodLabel::Negative
    } else {
        MoodLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(classify(0.05), MoodLabel::Positive);
        assert_eq!(classify(0.049), MoodLabel::Neutral);
        assert_eq!(classify(-0.05), MoodLabel::Negative);
        assert_eq!(classify(-0.049), MoodLabel::Neutral);
        assert_eq!(classify(0.0), MoodLabel::Neutral);
    }

    #[test]
    fn total_outside_range() {
        assert_eq!(classify(7.5), MoodLabel::Positive);
        assert_eq!(classify(f64::NEG_INFINITY), MoodLabel::Negative);
        assert_eq!(classify(f64::INFINITY), MoodLabel::Positive);
        assert_eq!(classify(f64::NAN), MoodLabel::Neutral);
    }

    #[test]
    fn parses_and_serializes_lowercase() {
        assert_eq!(" Positive ".parse::<MoodLabel>().unwrap(), MoodLabel::Positive);
        assert_eq!("NEG".parse::<MoodLabel>().unwrap(), MoodLabel::Negative);
        assert!(matches!(
            "meh".parse::<MoodLabel>(),
            Err(RecordError::UnknownLabel(_))
        ));
        let v = serde_json::to_value(MoodLabel::Neutral).unwrap();
        assert_eq!(v, serde_json::json!("neutral"));
        assert_eq!(MoodLabel::Negative.to_string(), "negative");
    }

    #[test]
    fn label_scale_is_linear() {
        assert_eq!(MoodLabel::Positive.label_score(), 1.0);
        assert_eq!(MoodLabel::Neutral.label_score(), 0.5);
        assert_eq!(MoodLabel::Negative.label_score(), 0.0);
    }
}
