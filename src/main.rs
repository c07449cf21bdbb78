use std::sync::Arc;

use anyhow::Result;
use weatherdigest::{
    AppState, OpenWeatherClient, TzfResolver, WeatherDigestConfig, WeatherService, logging, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherDigestConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        "Using config from {} (provider {})",
        WeatherDigestConfig::get_config_path().display(),
        config.provider.base_url
    );

    let provider = OpenWeatherClient::new(&config.provider)?;
    let service = WeatherService::new(Arc::new(provider), Arc::new(TzfResolver::new()));

    web::run(&config.bind_address(), AppState::new(service)).await
}
