// src/error.rs
//! Typed validation errors for records and aggregation input.

use thiserror::Error;

/// A source row could not be turned into a `Record`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("unparseable datetime `{0}`")]
    InvalidDatetime(String),

    #[error("unknown sentiment label `{0}` (expected positive, neutral or negative)")]
    UnknownLabel(String),
}

/// Malformed aggregation input. Points at an upstream loading defect, so it
/// is reported instead of repaired.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("record {index}: score {score} is not a finite value in [-1, 1]")]
    InvalidScore { index: usize, score: f64 },

    #[error("hour {0} is outside 0..=23")]
    InvalidHour(u32),
}
