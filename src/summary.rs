//! Forecast summarization
//!
//! Splits a forecast list into the remaining intervals of the local day and
//! per-day buckets, then reduces each bucket to high/low/average and a
//! representative description.
//!
//! Buckets are keyed on the sample's UTC date while the today filter works on
//! local dates. Near midnight a sample can therefore show up in today's list
//! while its statistics count towards a neighbouring date.

use crate::models::{DayBuckets, DaySummary, ForecastSample, TodayEntry};
use crate::{Result, WeatherError};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::collections::HashMap;

/// Forecast list split into today's remaining samples and UTC-day buckets
#[derive(Debug, Clone, Default)]
pub struct PartitionedForecast {
    /// Samples still ahead on the local calendar day, in forecast order
    pub today: Vec<ForecastSample>,
    pub buckets: DayBuckets,
}

/// Partition samples relative to a local "now".
///
/// A sample belongs to today when its local date equals `now`'s local date and
/// its local time-of-day is not earlier than `now`'s. Every sample is bucketed.
pub fn partition<Z: TimeZone>(samples: &[ForecastSample], now: &DateTime<Z>) -> PartitionedForecast {
    let zone = now.timezone();
    let today = now.date_naive();
    let now_time = now.time();

    let mut partitioned = PartitionedForecast::default();
    for sample in samples {
        let local = sample.timestamp.with_timezone(&zone);
        if local.date_naive() == today && local.time() >= now_time {
            partitioned.today.push(sample.clone());
        }
        partitioned.buckets.push(sample.clone());
    }
    partitioned
}

/// Project today's samples into local `HH:MM` display records
pub fn today_entries<Z: TimeZone>(samples: &[ForecastSample], zone: &Z) -> Vec<TodayEntry>
where
    Z::Offset: std::fmt::Display,
{
    samples
        .iter()
        .map(|sample| TodayEntry {
            time: sample.timestamp.with_timezone(zone).format("%H:%M").to_string(),
            temp: sample.temperature,
            description: sample.description.clone(),
        })
        .collect()
}

/// Summarize every bucket, in bucket order
pub fn summarize(buckets: &DayBuckets) -> Result<Vec<DaySummary>> {
    buckets
        .iter()
        .map(|(date, samples)| summarize_bucket(date, samples))
        .collect()
}

/// Reduce one day's samples into a `DaySummary`
pub fn summarize_bucket(date: NaiveDate, samples: &[ForecastSample]) -> Result<DaySummary> {
    if samples.is_empty() {
        return Err(WeatherError::EmptyBucket { date });
    }

    let temps: Vec<f64> = samples.iter().map(|s| s.temperature).collect();
    let high = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let avg = temps.iter().sum::<f64>() / temps.len() as f64;

    let description = most_common(samples.iter().map(|s| s.description.as_str()))
        .unwrap_or_default()
        .to_string();

    Ok(DaySummary {
        date,
        high: round_tenth(high),
        low: round_tenth(low),
        avg: round_tenth(avg),
        description,
    })
}

/// Most frequent item; on equal counts the one seen first wins
fn most_common<'a>(items: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }

    // Strict comparison keeps the earliest entry among ties
    let mut best: Option<(&str, usize)> = None;
    for (item, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

/// Round half away from zero to one decimal place
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
