//! Response body served by the `/weather` endpoint

use super::{CurrentConditions, DaySummary, GeoResult, TodayEntry};
use serde::{Deserialize, Serialize};

/// Location block of the response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl From<&GeoResult> for LocationInfo {
    fn from(place: &GeoResult) -> Self {
        Self {
            name: place.name.clone(),
            lat: place.latitude,
            lon: place.longitude,
            country: place.country.clone(),
            state: place.region.clone(),
        }
    }
}

/// Full weather digest for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherResponse {
    pub location: LocationInfo,
    pub current_weather: CurrentConditions,
    pub daily_forecast: Vec<DaySummary>,
    pub todays_forecast: Vec<TodayEntry>,
}
