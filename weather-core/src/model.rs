use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::WeatherError, icon::Icon};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
}

impl WeatherRequest {
    /// Build a request for `city`, trimmed. Blank input is rejected.
    pub fn new(city: impl AsRef<str>) -> Result<Self, WeatherError> {
        let city = city.as_ref().trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }
        Ok(Self { city: city.to_string() })
    }
}

/// Whether two city names refer to the same card: trimmed, compared without
/// case (Unicode-aware, so "Zürich" and "ZÜRICH" match).
pub fn same_city(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Everything a city card displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    /// Whole degrees Celsius, rounded down.
    pub temperature_c: i64,
    pub humidity_pct: u8,
    /// Km/h, converted from the m/s OpenWeather reports in metric units.
    pub wind_speed_kmh: f64,
    pub icon: Icon,
    pub icon_code: Option<String>,
    pub condition: String,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum CardState {
    Loading,
    Loaded(WeatherReport),
    Failed(String),
}

impl CardState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, CardState::Loaded(_))
    }
}

/// One city card: the query the user typed and what we know about it so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub query: String,
    #[serde(flatten)]
    pub state: CardState,
}

impl Card {
    pub fn loading(query: impl Into<String>) -> Self {
        Self { query: query.into(), state: CardState::Loading }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(WeatherError::InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }
}
