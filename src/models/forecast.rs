//! Forecast sample, day bucket and summary models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One provider interval sample (typically 3-hourly)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    /// Start of the interval, UTC
    pub timestamp: DateTime<Utc>,
    /// Temperature in the requested unit system
    pub temperature: f64,
    /// First weather condition reported for the interval
    pub description: String,
}

impl ForecastSample {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, description: impl Into<String>) -> Self {
        Self {
            timestamp,
            temperature,
            description: description.into(),
        }
    }

    /// Calendar date of the sample in UTC, the day-bucket key
    #[must_use]
    pub fn utc_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Samples grouped by UTC calendar date, in first-seen date order.
#[derive(Debug, Clone, Default)]
pub struct DayBuckets {
    order: Vec<NaiveDate>,
    buckets: HashMap<NaiveDate, Vec<ForecastSample>>,
}

impl DayBuckets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to the bucket for its UTC date
    pub fn push(&mut self, sample: ForecastSample) {
        let date = sample.utc_date();
        let bucket = self.buckets.entry(date).or_insert_with(|| {
            self.order.push(date);
            Vec::new()
        });
        bucket.push(sample);
    }

    /// Samples for a date, if any were bucketed
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&[ForecastSample]> {
        self.buckets.get(&date).map(Vec::as_slice)
    }

    /// Dates in the order their first sample arrived
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.order
    }

    /// Iterate buckets in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[ForecastSample])> {
        self.order.iter().map(|date| {
            let samples = self.buckets.get(date).map(Vec::as_slice).unwrap_or_default();
            (*date, samples)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<ForecastSample> for DayBuckets {
    fn from_iter<I: IntoIterator<Item = ForecastSample>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for sample in iter {
            buckets.push(sample);
        }
        buckets
    }
}

/// Statistical rollup of one day bucket
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaySummary {
    /// UTC calendar date of the bucket, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub avg: f64,
    /// Most frequent description of the day
    pub description: String,
}

/// One remaining interval of the current local day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TodayEntry {
    /// Local wall-clock time, `HH:MM`
    pub time: String,
    pub temp: f64,
    pub description: String,
}
