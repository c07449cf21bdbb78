//! Coordinate to IANA timezone resolution

use chrono_tz::Tz;
use std::collections::HashMap;
use tracing::debug;
use tzf_rs::DefaultFinder;

/// Maps coordinates to the timezone in force there
pub trait TimezoneResolver: Send + Sync {
    /// `None` when no zone covers the coordinates
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<Tz>;
}

/// Offline polygon lookup backed by the bundled timezone boundary data
pub struct TzfResolver {
    finder: DefaultFinder,
}

impl TzfResolver {
    /// Loads the boundary data; call once at startup
    #[must_use]
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver for TzfResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<Tz> {
        let name = self.finder.get_tz_name(longitude, latitude);
        if name.is_empty() {
            debug!("No timezone polygon covers ({latitude:.4}, {longitude:.4})");
            return None;
        }
        parse_zone(name)
    }
}

/// Deterministic resolver keyed on rounded coordinates
#[derive(Debug, Clone, Default)]
pub struct StaticTimezoneResolver {
    zones: HashMap<(i64, i64), Tz>,
    fallback: Option<Tz>,
}

impl StaticTimezoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every coordinate to one zone
    #[must_use]
    pub fn always(zone: Tz) -> Self {
        Self {
            zones: HashMap::new(),
            fallback: Some(zone),
        }
    }

    /// Register a zone for coordinates, matched to two decimal places
    #[must_use]
    pub fn with_zone(mut self, latitude: f64, longitude: f64, zone: Tz) -> Self {
        self.zones.insert(Self::key(latitude, longitude), zone);
        self
    }

    fn key(latitude: f64, longitude: f64) -> (i64, i64) {
        ((latitude * 100.0).round() as i64, (longitude * 100.0).round() as i64)
    }
}

impl TimezoneResolver for StaticTimezoneResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<Tz> {
        self.zones
            .get(&Self::key(latitude, longitude))
            .copied()
            .or(self.fallback)
    }
}

fn parse_zone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(zone) => Some(zone),
        Err(e) => {
            debug!("Unknown timezone name '{name}': {e}");
            None
        }
    }
}
