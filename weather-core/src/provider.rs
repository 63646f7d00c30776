use crate::{
    Config, WeatherError, WeatherReport, WeatherRequest, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherReport, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    build_provider(config, config.api_key())
}

fn build_provider(
    config: &Config,
    api_key: Option<String>,
) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = api_key.ok_or(WeatherError::MissingApiKey)?;
    let http = http_client(config)?;

    Ok(Box::new(OpenWeatherProvider::with_client(
        api_key,
        config.endpoints.openweather.clone(),
        http,
    )))
}

/// HTTP client shared by the weather and geolocation lookups.
pub fn http_client(config: &Config) -> Result<Client, WeatherError> {
    let client = Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!("weather-cards/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
