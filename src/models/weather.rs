//! Current conditions model

use serde::{Deserialize, Serialize};

/// Current conditions at a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in the requested unit system
    pub temp: f64,
    /// Apparent temperature
    pub feels_like: f64,
    /// Human-readable description of the conditions
    pub description: String,
}
