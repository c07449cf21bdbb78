//! HTTP API: `GET /weather` and `GET /health`

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    VERSION, WeatherError,
    models::{LocationQuery, WeatherResponse},
    service::WeatherService,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

impl AppState {
    pub fn new(service: WeatherService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Query string of `/weather`
#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    /// City name
    pub city: String,
    /// State or region code, e.g. "NJ"
    pub state: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country: Option<String>,
}

impl From<WeatherParams> for LocationQuery {
    fn from(params: WeatherParams) -> Self {
        Self {
            city: params.city,
            region: params.state,
            country: params.country,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub version: String,
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected: {self}");
        }
        let body = ErrorBody {
            detail: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherResponse>, WeatherError> {
    let query = LocationQuery::from(params);
    let response = state.service.get_weather(&query).await?;
    Ok(Json(response))
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}
