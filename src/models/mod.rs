//! Data models for `WeatherDigest`
//!
//! - Location: search queries and geocoded places
//! - Weather: current conditions
//! - Forecast: interval samples, day buckets and their summaries
//! - Response: the JSON shape served by `/weather`

pub mod forecast;
pub mod location;
pub mod response;
pub mod weather;

pub use forecast::{DayBuckets, DaySummary, ForecastSample, TodayEntry};
pub use location::{GeoResult, LocationQuery};
pub use response::{LocationInfo, WeatherResponse};
pub use weather::CurrentConditions;
