//! Error types and handling for `WeatherDigest`

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the `WeatherDigest` service
#[derive(Error, Debug)]
pub enum WeatherError {
    /// The location or its forecast could not be resolved
    #[error("{message}")]
    NotFound { message: String },

    /// An outbound provider call failed or returned an unusable payload
    #[error("Upstream error: {message}")]
    Upstream {
        /// Status reported by the provider, if it answered at all
        status: Option<u16>,
        message: String,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A day bucket reached the summarizer without samples
    #[error("Empty forecast bucket for {date}")]
    EmptyBucket { date: NaiveDate },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an upstream error for a non-success provider status
    pub fn upstream_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an upstream error for transport or payload failures
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to at the endpoint
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            WeatherError::NotFound { .. } => 404,
            WeatherError::Validation { .. } => 400,
            WeatherError::Upstream {
                status: Some(status),
                ..
            } if (400..600).contains(status) => *status,
            WeatherError::Upstream { .. } => 502,
            WeatherError::EmptyBucket { .. } | WeatherError::Config { .. } => 500,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::NotFound { message } => message.clone(),
            WeatherError::Validation { message } => format!("Invalid input: {message}"),
            WeatherError::Upstream { .. } => {
                "The weather provider could not be reached or returned an invalid response."
                    .to_string()
            }
            WeatherError::EmptyBucket { .. } => "Internal server error".to_string(),
            WeatherError::Config { .. } => {
                "Service is misconfigured. Please check the provider settings.".to_string()
            }
        }
    }
}
