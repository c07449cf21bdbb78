//! Weather digest orchestration
//!
//! One request runs geocode, current conditions and forecast in order, then
//! hands the forecast to the summarizer in the location's local time.

use crate::clock::{Clock, SystemClock};
use crate::location_resolver::LocationResolver;
use crate::models::{LocationInfo, LocationQuery, WeatherResponse};
use crate::provider::WeatherProvider;
use crate::summary;
use crate::timezone::TimezoneResolver;
use crate::{Result, WeatherError};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Builds weather digests from a provider, a timezone resolver and a clock
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    timezones: Arc<dyn TimezoneResolver>,
    clock: Arc<dyn Clock>,
}

impl WeatherService {
    /// Service using the system clock
    pub fn new(provider: Arc<dyn WeatherProvider>, timezones: Arc<dyn TimezoneResolver>) -> Self {
        Self::with_clock(provider, timezones, Arc::new(SystemClock))
    }

    pub fn with_clock(
        provider: Arc<dyn WeatherProvider>,
        timezones: Arc<dyn TimezoneResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            timezones,
            clock,
        }
    }

    /// Current conditions, today's remaining intervals and the per-day rollup
    #[instrument(skip(self), fields(search = %query.search_string()))]
    pub async fn get_weather(&self, query: &LocationQuery) -> Result<WeatherResponse> {
        if query.is_blank() {
            return Err(WeatherError::validation("City cannot be empty"));
        }

        let place = LocationResolver::resolve_location(self.provider.as_ref(), query).await?;

        let current_weather = self
            .provider
            .current_weather(place.latitude, place.longitude)
            .await?;

        let samples = self
            .provider
            .forecast(place.latitude, place.longitude)
            .await?;
        if samples.is_empty() {
            return Err(WeatherError::not_found("Forecast not found"));
        }

        let zone = self.local_zone(place.latitude, place.longitude);
        let now_local = self.clock.now().with_timezone(&zone);

        let partitioned = summary::partition(&samples, &now_local);
        let daily_forecast = summary::summarize(&partitioned.buckets)?;
        let todays_forecast = summary::today_entries(&partitioned.today, &zone);

        info!(
            "Built digest for {} ({}): {} day(s), {} interval(s) left today",
            place.name,
            zone.name(),
            daily_forecast.len(),
            todays_forecast.len()
        );

        Ok(WeatherResponse {
            location: LocationInfo::from(&place),
            current_weather,
            daily_forecast,
            todays_forecast,
        })
    }

    /// Zone for the coordinates, UTC when none is known
    fn local_zone(&self, latitude: f64, longitude: f64) -> Tz {
        self.timezones
            .resolve(latitude, longitude)
            .unwrap_or_else(|| {
                warn!("No timezone for ({latitude:.4}, {longitude:.4}), falling back to UTC");
                Tz::UTC
            })
    }
}
