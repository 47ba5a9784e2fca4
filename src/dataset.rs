// src/dataset.rs
//! Explicit, caller-owned dataset handle.
//!
//! Built once from validated records and then only read. Cloning is cheap
//! (records sit behind an `Arc`), so one handle can be shared across threads.

use anyhow::{anyhow, Context, Result};
use chrono::Weekday;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::aggregate::{self, filter_records, validate_records, Aggregates, RecordFilter};
use crate::error::AggregateError;
use crate::mood::MoodLabel;
use crate::record::{RawRecord, Record};
use crate::sentiment::SentimentAnalyzer;
use crate::terms::{self, TermCount};

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Record]>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
        }
    }
}

impl Dataset {
    /// Validate and take ownership of `records`.
    pub fn new(records: Vec<Record>) -> Result<Self, AggregateError> {
        validate_records(&records)?;
        Ok(Self {
            records: records.into(),
        })
    }

    /// Convert source rows; the first bad row aborts with its position.
    /// Rows without a score are scored with the built-in lexicon.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        Self::from_rows_with(rows, &SentimentAnalyzer::new())
    }

    /// Like [`Dataset::from_rows`], scoring unscored rows with `analyzer`.
    pub fn from_rows_with<I>(rows: I, analyzer: &SentimentAnalyzer) -> Result<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_record(analyzer).with_context(|| format!("row {i}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(records)?)
    }

    /// Parse rows given either as a JSON array or as JSON lines.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json_str_with(s, &SentimentAnalyzer::new())
    }

    pub fn from_json_str_with(s: &str, analyzer: &SentimentAnalyzer) -> Result<Self> {
        let trimmed = s.trim_start();
        if trimmed.starts_with('[') {
            let rows: Vec<RawRecord> =
                serde_json::from_str(trimmed).context("parsing JSON array of rows")?;
            return Self::from_rows_with(rows, analyzer);
        }
        let rows = trimmed
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(n, l)| {
                serde_json::from_str::<RawRecord>(l)
                    .map_err(|e| anyhow!("line {}: {}", n + 1, e))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows_with(rows, analyzer)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &SentimentAnalyzer::new())
    }

    pub fn load_with(path: &Path, analyzer: &SentimentAnalyzer) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dataset from {}", path.display()))?;
        let ds = Self::from_json_str_with(&content, analyzer)
            .with_context(|| format!("loading dataset {}", path.display()))?;
        info!(target: "chronomood::dataset", path = %path.display(), records = ds.len(), "dataset loaded");
        Ok(ds)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct weekdays present, Monday first.
    pub fn days(&self) -> Vec<Weekday> {
        let mut days: Vec<Weekday> = self.records.iter().map(Record::weekday).collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        days
    }

    pub fn select(&self, filter: &RecordFilter) -> Result<Vec<&Record>, AggregateError> {
        filter_records(&self.records, filter)
    }

    pub fn aggregate(&self, filter: Option<&RecordFilter>) -> Result<Aggregates, AggregateError> {
        match filter {
            Some(f) => {
                f.validate()?;
                aggregate::aggregate(&self.records, Some(&|r: &Record| f.matches(r)))
            }
            None => aggregate::aggregate(&self.records, None),
        }
    }

    pub fn top_terms(
        &self,
        filter: &RecordFilter,
        label: MoodLabel,
        limit: usize,
        extra_stopwords: &[String],
    ) -> Result<Vec<TermCount>, AggregateError> {
        let selected = self.select(filter)?;
        Ok(terms::top_terms(selected, label, limit, extra_stopwords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = r#"[
        {"datetime": "2020-04-08 09:10:00", "text": "great coffee", "sentiment": "positive", "score": 0.6},
        {"datetime": "2020-04-06 09:20:00", "text": "meh", "sentiment": "neutral", "score": 0.0},
        {"datetime": "2020-04-06 22:00:00", "text": "awful night", "sentiment": "negative"}
    ]"#;

    #[test]
    fn loads_json_array() {
        let ds = Dataset::from_json_str(ROWS).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.records()[2].score < 0.0);
        assert_eq!(ds.days(), vec![Weekday::Mon, Weekday::Wed]);
    }

    #[test]
    fn loads_json_lines() {
        let jsonl = "{\"datetime\":\"2020-04-06 09:00:00\",\"text\":\"a\",\"sentiment\":\"positive\",\"score\":0.5}\n\n{\"datetime\":\"2020-04-06 10:00:00\",\"text\":\"b\",\"sentiment\":\"negative\",\"score\":-0.5}\n";
        let ds = Dataset::from_json_str(jsonl).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn reports_bad_row_position() {
        let bad = r#"[{"datetime": "2020-04-06 09:00:00", "text": "a", "sentiment": "happy"}]"#;
        let err = Dataset::from_json_str(bad).unwrap_err();
        assert!(format!("{err:#}").contains("row 0"), "{err:#}");

        let bad_line = "{\"datetime\":\"2020-04-06 09:00:00\"}\n";
        let err = Dataset::from_json_str(bad_line).unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let bad = r#"[{"datetime": "2020-04-06 09:00:00", "text": "a", "sentiment": "positive", "score": 3.0}]"#;
        assert!(Dataset::from_json_str(bad).is_err());
    }

    #[test]
    fn filtered_views() {
        let ds = Dataset::from_json_str(ROWS).unwrap();
        let mon9 = RecordFilter::any().day(Weekday::Mon).hour(9);
        assert_eq!(ds.select(&mon9).unwrap().len(), 1);

        let all = ds.aggregate(None).unwrap();
        assert_eq!(all.hour(9).unwrap().records, 2);
        let mon = ds.aggregate(Some(&RecordFilter::any().day(Weekday::Mon))).unwrap();
        assert_eq!(mon.hour(9).unwrap().records, 1);
        assert!(ds.aggregate(Some(&RecordFilter::any().hour(30))).is_err());

        let terms = ds
            .top_terms(&RecordFilter::any(), MoodLabel::Positive, 5, &[])
            .unwrap();
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn unscored_rows_use_the_given_analyzer() {
        let lex = crate::lexicon::Lexicon::from_json_str(r#"{"stonks": 3.5}"#).unwrap();
        let analyzer = SentimentAnalyzer::with_lexicon(Arc::new(lex));
        let rows = r#"[{"datetime": "2020-04-06 09:00:00", "text": "stonks", "sentiment": "positive"}]"#;

        assert_eq!(Dataset::from_json_str(rows).unwrap().records()[0].score, 0.0);
        let ds = Dataset::from_json_str_with(rows, &analyzer).unwrap();
        assert!(ds.records()[0].score > 0.5);
    }

    #[test]
    fn empty_dataset_is_fine() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert!(ds.days().is_empty());
        assert!(ds.aggregate(None).unwrap().is_empty());
    }
}
