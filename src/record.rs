// src/record.rs
//! Caller-owned records and the raw row shape they are converted from.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::mood::MoodLabel;
use crate::sentiment::SentimentAnalyzer;

/// One scored message. The core only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub text: String,
    pub label: MoodLabel,
    /// Compound polarity in [-1, 1].
    pub score: f64,
}

impl Record {
    pub fn new(
        timestamp: NaiveDateTime,
        text: impl Into<String>,
        label: MoodLabel,
        score: f64,
    ) -> Self {
        Self {
            timestamp,
            text: text.into(),
            label,
            score,
        }
    }

    /// Score `text` with `analyzer` and take the label from the compound.
    pub fn scored(timestamp: NaiveDateTime, text: impl Into<String>, analyzer: &SentimentAnalyzer) -> Self {
        let text = text.into();
        let analysis = analyzer.analyze(&text);
        Self {
            timestamp,
            text,
            label: analysis.mood,
            score: analysis.score.compound,
        }
    }

    /// Hour of day, 0..=23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }
}

/// Row as delivered by the tabular source: `{datetime, text, sentiment, score?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub datetime: String,
    pub text: String,
    pub sentiment: String,
    /// Precomputed compound; scored from `text` when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RawRecord {
    /// Convert, scoring `text` with `analyzer` when the row has no score.
    pub fn into_record(self, analyzer: &SentimentAnalyzer) -> Result<Record, RecordError> {
        let timestamp = parse_datetime(&self.datetime)?;
        let label: MoodLabel = self.sentiment.parse()?;
        let score = match self.score {
            Some(s) => s,
            None => analyzer.score(&self.text).compound,
        };
        Ok(Record {
            timestamp,
            text: self.text,
            label,
            score,
        })
    }
}

/// Uses the built-in lexicon for rows without a score.
impl TryFrom<RawRecord> for Record {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        raw.into_record(&SentimentAnalyzer::new())
    }
}

const DATE_ONLY: &str = "%Y-%m-%d";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a source datetime. Offsets are dropped, keeping the wall-clock time
/// the message was posted at.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, RecordError> {
    let s = s.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%z") {
        return Ok(dt.naive_local());
    }
    // Bare dates land at midnight.
    if let Some(dt) = NaiveDate::parse_from_str(s, DATE_ONLY)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }
    Err(RecordError::InvalidDatetime(s.to_string()))
}
