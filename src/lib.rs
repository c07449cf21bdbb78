//! `WeatherDigest` - weather aggregation backend
//!
//! Geocodes a city, fetches current conditions and the interval forecast from
//! OpenWeatherMap, and serves a digest of today's remaining hours plus a
//! per-day high/low/average rollup in the location's local time.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod provider;
pub mod service;
pub mod summary;
pub mod timezone;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::WeatherDigestConfig;
pub use error::WeatherError;
pub use models::{DaySummary, ForecastSample, GeoResult, LocationQuery, TodayEntry, WeatherResponse};
pub use provider::{OpenWeatherClient, WeatherProvider};
pub use service::WeatherService;
pub use timezone::{StaticTimezoneResolver, TimezoneResolver, TzfResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
