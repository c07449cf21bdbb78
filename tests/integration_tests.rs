//! End-to-end tests for the `/weather` endpoint against a mock provider

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::NaiveDateTime;
use serde_json::{Value, json};
use tower::ServiceExt;
use weatherdigest::config::ProviderConfig;
use weatherdigest::{
    AppState, FixedClock, OpenWeatherClient, StaticTimezoneResolver, WeatherService, web,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key-123";

fn provider_config(server: &MockServer, max_retries: u32) -> ProviderConfig {
    ProviderConfig {
        api_key: Some(API_KEY.to_string()),
        base_url: server.uri(),
        timeout_seconds: 5,
        max_retries,
    }
}

fn router(server: &MockServer, zones: StaticTimezoneResolver, max_retries: u32) -> axum::Router {
    router_with_config(provider_config(server, max_retries), zones)
}

fn router_with_config(config: ProviderConfig, zones: StaticTimezoneResolver) -> axum::Router {
    let provider = OpenWeatherClient::new(&config).unwrap();
    let now = NaiveDateTime::parse_from_str("2024-06-02 10:00:00", "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc();
    let service = WeatherService::with_clock(
        Arc::new(provider),
        Arc::new(zones),
        Arc::new(FixedClock(now)),
    );
    web::app(AppState::new(service))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Helper to create a geocoding payload for Paris
fn paris_geocoding() -> Value {
    json!([{
        "name": "Paris",
        "local_names": {"fr": "Paris"},
        "lat": 48.8589,
        "lon": 2.32,
        "country": "FR",
        "state": "Ile-de-France"
    }])
}

fn current_weather() -> Value {
    json!({
        "coord": {"lon": 2.32, "lat": 48.8589},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 68.4, "feels_like": 67.1, "temp_min": 66.0, "temp_max": 70.2},
        "name": "Paris"
    })
}

fn forecast_entry(dt_txt: &str, temp: f64, description: &str) -> Value {
    json!({
        "main": {"temp": temp, "feels_like": temp},
        "weather": [{"description": description}],
        "dt_txt": dt_txt
    })
}

fn forecast() -> Value {
    json!({
        "cod": "200",
        "cnt": 4,
        "list": [
            forecast_entry("2024-06-02 09:00:00", 61.0, "clear sky"),
            forecast_entry("2024-06-02 12:00:00", 66.5, "few clouds"),
            forecast_entry("2024-06-02 21:00:00", 59.9, "clear sky"),
            forecast_entry("2024-06-03 00:00:00", 57.2, "light rain"),
        ],
        "city": {"name": "Paris", "country": "FR", "timezone": 7200}
    })
}

async fn mount_geocoding(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_current(server: &MockServer, template: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(template)
        .expect(calls)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, template: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(template)
        .expect(calls)
        .mount(server)
        .await;
}

fn paris_zone() -> StaticTimezoneResolver {
    StaticTimezoneResolver::new().with_zone(48.8589, 2.32, chrono_tz::Europe::Paris)
}

#[tokio::test]
async fn test_full_digest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris,FR"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_geocoding()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "imperial"))
        .and(query_param("lat", "48.8589"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(router(&server, paris_zone(), 0), "/weather?city=Paris&country=FR").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["location"],
        json!({"name": "Paris", "lat": 48.8589, "lon": 2.32, "country": "FR", "state": "Ile-de-France"})
    );
    assert_eq!(
        body["current_weather"],
        json!({"temp": 68.4, "feels_like": 67.1, "description": "clear sky"})
    );
    assert_eq!(
        body["daily_forecast"],
        json!([
            {"date": "2024-06-02", "high": 66.5, "low": 59.9, "avg": 62.5, "description": "clear sky"},
            {"date": "2024-06-03", "high": 57.2, "low": 57.2, "avg": 57.2, "description": "light rain"}
        ])
    );
    // Now is 12:00 in Paris; 11:00 local is already past, 02:00 is tomorrow
    assert_eq!(
        body["todays_forecast"],
        json!([
            {"time": "14:00", "temp": 66.5, "description": "few clouds"},
            {"time": "23:00", "temp": 59.9, "description": "clear sky"}
        ])
    );
}

#[tokio::test]
async fn test_unknown_location_stops_after_geocoding() {
    let server = MockServer::start().await;
    mount_geocoding(&server, json!([])).await;
    mount_current(&server, ResponseTemplate::new(200).set_body_json(current_weather()), 0).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast()), 0).await;

    let (status, body) = get(router(&server, paris_zone(), 0), "/weather?city=Atlantis").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Location not found");
}

#[tokio::test]
async fn test_empty_forecast_is_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(&server, paris_geocoding()).await;
    mount_current(&server, ResponseTemplate::new(200).set_body_json(current_weather()), 1).await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"cod": "200", "list": []})),
        1,
    )
    .await;

    let (status, body) = get(router(&server, paris_zone(), 0), "/weather?city=Paris").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Forecast not found");
}

#[tokio::test]
async fn test_timezone_fallback_uses_utc() {
    let server = MockServer::start().await;
    mount_geocoding(&server, paris_geocoding()).await;
    mount_current(&server, ResponseTemplate::new(200).set_body_json(current_weather()), 1).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast()), 1).await;

    let (status, body) =
        get(router(&server, StaticTimezoneResolver::new(), 0), "/weather?city=Paris").await;

    assert_eq!(status, StatusCode::OK);
    let times: Vec<&str> = body["todays_forecast"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["12:00", "21:00"]);
    assert_eq!(body["daily_forecast"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_client_errors_are_propagated_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"cod": 401, "message": "Invalid API key"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_current(&server, ResponseTemplate::new(200).set_body_json(current_weather()), 0).await;

    let (status, body) = get(router(&server, paris_zone(), 2), "/weather?city=Paris").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_server_errors_are_retried_then_propagated() {
    let server = MockServer::start().await;
    mount_geocoding(&server, paris_geocoding()).await;
    mount_current(&server, ResponseTemplate::new(503), 2).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast()), 0).await;

    let (status, _) = get(router(&server, paris_zone(), 1), "/weather?city=Paris").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_gateway() {
    let server = MockServer::start().await;
    mount_geocoding(&server, paris_geocoding()).await;
    mount_current(&server, ResponseTemplate::new(200).set_body_json(current_weather()), 1).await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
        1,
    )
    .await;

    let (status, body) = get(router(&server, paris_zone(), 0), "/weather?city=Paris").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("weather provider"));
}

#[tokio::test]
async fn test_slow_provider_times_out_as_bad_gateway() {
    let server = MockServer::start().await;
    mount_geocoding(&server, paris_geocoding()).await;
    mount_current(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(current_weather())
            .set_delay(Duration::from_secs(3)),
        1,
    )
    .await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast()), 0).await;

    let config = ProviderConfig {
        timeout_seconds: 1,
        ..provider_config(&server, 0)
    };
    let (status, body) = get(router_with_config(config, paris_zone()), "/weather?city=Paris").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("weather provider"));
}
