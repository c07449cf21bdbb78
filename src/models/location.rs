//! Location query and geocoding result models

/// A free-text location search: city plus optional region and country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    /// City name
    pub city: String,
    /// Region or state code (e.g. "NJ")
    pub region: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country: Option<String>,
}

impl LocationQuery {
    /// Create a query for a city only
    #[must_use]
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            region: None,
            country: None,
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Provider search string: `city[,region][,country]`.
    ///
    /// Absent or blank parts are skipped, so there is never an empty segment.
    #[must_use]
    pub fn search_string(&self) -> String {
        [
            Some(self.city.as_str()),
            self.region.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
    }

    /// True if the query carries no usable city name
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.city.trim().is_empty()
    }
}

/// A geocoded place, the first candidate returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    /// Resolved place name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    /// Region or state name
    pub region: Option<String>,
}

impl GeoResult {
    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
