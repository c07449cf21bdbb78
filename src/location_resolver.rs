//! Location Resolution Module
//!
//! Turns a [`LocationQuery`] into the single geocoded place the rest of the
//! request works with.

use crate::models::{GeoResult, LocationQuery};
use crate::provider::WeatherProvider;
use crate::{Result, WeatherError};
use tracing::debug;

/// Service for resolving location queries
pub struct LocationResolver;

impl LocationResolver {
    /// Geocode the query and keep the first (best) candidate
    pub async fn resolve_location(
        provider: &dyn WeatherProvider,
        query: &LocationQuery,
    ) -> Result<GeoResult> {
        let search = query.search_string();
        debug!("Geocoding location query: {}", search);

        let place = provider
            .geocode(&search)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::not_found("Location not found"))?;

        debug!(
            "Resolved location: {} at ({})",
            place.name,
            place.format_coordinates()
        );

        Ok(place)
    }
}
