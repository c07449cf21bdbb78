//! Weather provider seam
//!
//! The service talks to the provider through [`WeatherProvider`] so tests can
//! stand in a mock server or an in-memory fake.

use crate::Result;
use crate::models::{CurrentConditions, ForecastSample, GeoResult};
use async_trait::async_trait;

pub mod openweather;

pub use openweather::OpenWeatherClient;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Candidate places for a search string, best match first
    async fn geocode(&self, query: &str) -> Result<Vec<GeoResult>>;

    /// Current conditions at the coordinates
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions>;

    /// Interval forecast at the coordinates, oldest first
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>>;
}
