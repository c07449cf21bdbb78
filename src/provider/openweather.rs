//! OpenWeatherMap client
//!
//! Geocoding, current conditions and the 5-day/3-hour forecast. All
//! temperatures are requested in imperial units.

use super::WeatherProvider;
use crate::config::ProviderConfig;
use crate::models::{CurrentConditions, ForecastSample, GeoResult};
use crate::{Result, WeatherError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{
    RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const UNITS: &str = "imperial";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FALLBACK_DESCRIPTION: &str = "Unknown";
const USER_AGENT: &str = concat!("WeatherDigest/", env!("CARGO_PKG_VERSION"));

/// Retry connection failures, timeouts and 5xx; never 4xx
struct TransientOnly;

impl RetryableStrategy for TransientOnly {
    fn handle(
        &self,
        res: &std::result::Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) if response.status().is_server_error() => Some(Retryable::Transient),
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

/// OpenWeatherMap API client
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Build a client with timeout and retry policy from the provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WeatherError::config("Weather provider API key is missing"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        let policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(200), Duration::from_secs(5))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                policy,
                TransientOnly,
            ))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// GET `{base_url}{path_and_query}&appid=...` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str, what: &str) -> Result<T> {
        debug!("{what} request: {}{path_and_query}", self.base_url);
        let url = format!(
            "{}{}&appid={}",
            self.base_url,
            path_and_query,
            urlencoding::encode(&self.api_key)
        );

        let start_time = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::upstream(format!("{what} request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::upstream(format!("Failed to read {what} response: {e}")))?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow {what} response: {:.3}s", elapsed.as_secs_f64());
        }

        if !status.is_success() {
            warn!("{what} request returned {status}");
            return Err(WeatherError::upstream_status(
                status.as_u16(),
                format!("{what} request failed with status {status}: {}", truncate_body(&body)),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::upstream(format!("Invalid {what} payload: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Vec<GeoResult>> {
        let path = format!("/geo/1.0/direct?q={}&limit=1", urlencoding::encode(query));
        let entries: Vec<OwGeocodingEntry> = self.get_json(&path, "geocoding").await?;
        info!("Geocoding '{query}' returned {} candidate(s)", entries.len());
        Ok(entries.into_iter().map(GeoResult::from).collect())
    }

    #[instrument(skip(self))]
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        let path = format!("/data/2.5/weather?lat={latitude}&lon={longitude}&units={UNITS}");
        let current: OwCurrentResponse = self.get_json(&path, "current weather").await?;
        Ok(current.into())
    }

    #[instrument(skip(self))]
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>> {
        let path = format!("/data/2.5/forecast?lat={latitude}&lon={longitude}&units={UNITS}");
        let forecast: OwForecastResponse = self.get_json(&path, "forecast").await?;
        let samples = forecast
            .list
            .into_iter()
            .map(ForecastSample::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!("Forecast contains {} samples", samples.len());
        Ok(samples)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX_LEN: usize = 200;
    if body.chars().count() <= MAX_LEN {
        body.to_string()
    } else {
        let truncated: String = body.chars().take(MAX_LEN).collect();
        format!("{truncated}...")
    }
}

fn first_description(conditions: Vec<OwCondition>) -> String {
    conditions
        .into_iter()
        .next()
        .map(|c| c.description)
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string())
}

#[derive(Debug, Deserialize)]
struct OwGeocodingEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<OwGeocodingEntry> for GeoResult {
    fn from(entry: OwGeocodingEntry) -> Self {
        Self {
            name: entry.name,
            latitude: entry.lat,
            longitude: entry.lon,
            country: entry.country,
            region: entry.state,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwCurrentMain,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(response: OwCurrentResponse) -> Self {
        Self {
            temp: response.main.temp,
            feels_like: response.main.feels_like,
            description: first_description(response.weather),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwCondition>,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwForecastEntry> for ForecastSample {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self> {
        let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
            .map_err(|e| {
                WeatherError::upstream(format!(
                    "Invalid forecast timestamp '{}': {e}",
                    entry.dt_txt
                ))
            })?
            .and_utc();

        Ok(Self {
            timestamp,
            temperature: entry.main.temp,
            description: first_description(entry.weather),
        })
    }
}
