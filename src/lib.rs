// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod lexicon;
pub mod logging;
pub mod mood;
pub mod normalize;
pub mod record;
pub mod sentiment;
pub mod terms;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{
    aggregate, filter_records, Aggregates, HourlyAggregate, LabelCounts, RecordFilter,
};
pub use crate::config::AppConfig;
pub use crate::dataset::Dataset;
pub use crate::error::{AggregateError, RecordError};
pub use crate::lexicon::Lexicon;
pub use crate::mood::{classify, MoodLabel};
pub use crate::record::{RawRecord, Record};
pub use crate::sentiment::{score, ScoreResult, SentimentAnalyzer};
pub use crate::terms::{top_terms, TermCount};
