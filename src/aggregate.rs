//! # Temporal Aggregator
//! Pure group-by over records: hour-of-day means and hour × label counts.
//!
//! - Hours without records are absent (nothing is synthesized).
//! - Label counts are dense: every label is present, zero when unseen.
//! - Input is never mutated; the same input always yields the same output.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::AggregateError;
use crate::mood::MoodLabel;
use crate::record::Record;

/// Day/hour selection, the two dashboard filters. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub day: Option<Weekday>,
    pub hour: Option<u32>,
}

impl RecordFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn day(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    pub fn hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn validate(&self) -> Result<(), AggregateError> {
        match self.hour {
            Some(h) if h > 23 => Err(AggregateError::InvalidHour(h)),
            _ => Ok(()),
        }
    }

    pub fn matches(&self, r: &Record) -> bool {
        self.day.map_or(true, |d| r.weekday() == d) && self.hour.map_or(true, |h| r.hour() == h)
    }
}

/// Label → count, always holding all three labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelCounts(BTreeMap<MoodLabel, usize>);

impl Default for LabelCounts {
    fn default() -> Self {
        Self(MoodLabel::ALL.iter().map(|l| (*l, 0)).collect())
    }
}

impl LabelCounts {
    pub fn get(&self, label: MoodLabel) -> usize {
        self.0.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoodLabel, usize)> + '_ {
        self.0.iter().map(|(l, n)| (*l, *n))
    }

    fn bump(&mut self, label: MoodLabel) {
        *self.0.entry(label).or_insert(0) += 1;
    }
}

impl<'a> FromIterator<&'a Record> for LabelCounts {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        let mut counts = LabelCounts::default();
        for r in iter {
            counts.bump(r.label);
        }
        counts
    }
}

/// Statistics for one populated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyAggregate {
    pub hour: u32,
    pub records: usize,
    /// Mean of `MoodLabel::label_score` (positive 1, neutral 0.5, negative 0).
    pub mean_score: f64,
    /// Mean of the records' compound scores, in [-1, 1].
    pub mean_compound: f64,
    pub counts: LabelCounts,
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    /// One entry per populated hour, ascending.
    pub hourly: Vec<HourlyAggregate>,
    /// Label distribution over every selected record.
    pub totals: LabelCounts,
}

impl Aggregates {
    pub fn hour(&self, hour: u32) -> Option<&HourlyAggregate> {
        self.hourly.iter().find(|h| h.hour == hour)
    }

    /// Hour × label volume table.
    pub fn count_table(&self) -> BTreeMap<u32, LabelCounts> {
        self.hourly
            .iter()
            .map(|h| (h.hour, h.counts.clone()))
            .collect()
    }

    pub fn total_records(&self) -> usize {
        self.totals.total()
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }
}

/// Reject records a well-behaved loader could not have produced.
pub fn validate_records(records: &[Record]) -> Result<(), AggregateError> {
    for (index, r) in records.iter().enumerate() {
        if !r.score.is_finite() || !(-1.0..=1.0).contains(&r.score) {
            return Err(AggregateError::InvalidScore {
                index,
                score: r.score,
            });
        }
    }
    Ok(())
}

/// Records matching `filter`, in input order, by reference.
pub fn filter_records<'a>(
    records: &'a [Record],
    filter: &RecordFilter,
) -> Result<Vec<&'a Record>, AggregateError> {
    filter.validate()?;
    Ok(records.iter().filter(|r| filter.matches(r)).collect())
}

#[derive(Default)]
struct Bucket {
    records: usize,
    label_sum: f64,
    compound_sum: f64,
    counts: LabelCounts,
}

/// Group records (optionally pre-filtered by `filter`) by hour of day.
pub fn aggregate(
    records: &[Record],
    filter: Option<&dyn Fn(&Record) -> bool>,
) -> Result<Aggregates, AggregateError> {
    validate_records(records)?;

    let mut buckets: BTreeMap<u32, Bucket> = BTreeMap::new();
    let mut totals = LabelCounts::default();
    for r in records.iter().filter(|r| filter.map_or(true, |f| f(r))) {
        let b = buckets.entry(r.hour()).or_default();
        b.records += 1;
        b.label_sum += r.label.label_score();
        b.compound_sum += r.score;
        b.counts.bump(r.label);
        totals.bump(r.label);
    }

    let hourly: Vec<HourlyAggregate> = buckets
        .into_iter()
        .map(|(hour, b)| HourlyAggregate {
            hour,
            records: b.records,
            mean_score: b.label_sum / b.records as f64,
            mean_compound: b.compound_sum / b.records as f64,
            counts: b.counts,
        })
        .collect();

    debug!(
        target: "chronomood::aggregate",
        input = records.len(),
        selected = totals.total(),
        hours = hourly.len(),
        "aggregated"
    );

    Ok(Aggregates { hourly, totals })
}
