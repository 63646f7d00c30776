use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::WeatherError,
    icon::Icon,
    model::{WeatherReport, WeatherRequest},
};

use super::{WeatherProvider, join_url, truncate_body};

const CURRENT_PATH: &str = "data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_client(api_key: String, base_url: String, http: Client) -> Self {
        Self { api_key, base_url, http }
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let url = join_url(&self.base_url, CURRENT_PATH);
        debug!(%city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%city, %status, "OpenWeather responded");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        parse_current(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// Map a successful current-weather body to card view state.
pub fn parse_current(body: &str) -> Result<WeatherReport, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let first = parsed.weather.first();
    let icon_code = first.and_then(|w| w.icon.clone());
    let icon = icon_code.as_deref().map(Icon::from_code).unwrap_or_default();
    let condition = first
        .and_then(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(WeatherReport {
        location: parsed.name,
        temperature_c: parsed.main.temp.floor() as i64,
        humidity_pct: parsed.main.humidity,
        wind_speed_kmh: mps_to_kmh(parsed.wind.speed),
        icon,
        icon_code,
        condition,
        observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}

/// Build an error from a non-success response, preferring the API's own `message`.
pub fn api_error(status: StatusCode, body: &str) -> WeatherError {
    let message = serde_json::from_str::<OwErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| truncate_body(body));

    WeatherError::Api { status, message }
}

fn mps_to_kmh(speed: f64) -> f64 {
    (speed * 3.6 * 10.0).round() / 10.0
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherReport, WeatherError> {
        self.fetch_current(&request.city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 12.78, "feels_like": 12.1, "humidity": 81, "pressure": 1012},
        "wind": {"speed": 4.12, "deg": 240},
        "dt": 1700000000,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn maps_current_weather_to_report() {
        let report = parse_current(LONDON).unwrap();
        assert_eq!(report.location, "London");
        assert_eq!(report.temperature_c, 12);
        assert_eq!(report.humidity_pct, 81);
        assert_eq!(report.wind_speed_kmh, 14.8);
        assert_eq!(report.icon, Icon::Drizzle);
        assert_eq!(report.icon_code.as_deref(), Some("04d"));
        assert_eq!(report.condition, "broken clouds");
        assert_eq!(report.observed_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn negative_temperatures_round_down() {
        let body = r#"{"name":"Oymyakon","main":{"temp":-40.2,"humidity":70},
                       "wind":{"speed":0},"weather":[{"icon":"13n","description":"snow"}]}"#;
        let report = parse_current(body).unwrap();
        assert_eq!(report.temperature_c, -41);
        assert_eq!(report.icon, Icon::Snow);
        assert_eq!(report.observed_at, None);
    }

    #[test]
    fn missing_weather_entry_defaults_to_clear() {
        let body = r#"{"name":"Nowhere","main":{"temp":20.0,"humidity":10},
                       "wind":{"speed":1.0},"weather":[]}"#;
        let report = parse_current(body).unwrap();
        assert_eq!(report.icon, Icon::Clear);
        assert_eq!(report.icon_code, None);
        assert_eq!(report.condition, "Unknown");
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_current(r#"{"name":"x"}"#).unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[test]
    fn api_error_uses_message_field() {
        let err = api_error(StatusCode::NOT_FOUND, r#"{"cod":"404","message":"city not found"}"#);
        match err {
            WeatherError::Api { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "city not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(err.to_string().contains("<html>bad gateway</html>"));
    }
}
