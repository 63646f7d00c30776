use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced while building a single city card or resolving the user's city.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Enter City Name")]
    EmptyCity,

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weather configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,

    /// The API answered with a non-success status. `message` is the API's own
    /// explanation when it sent one (e.g. "city not found").
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not determine your city: {0}")]
    Geolocation(String),

    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_shows_message_and_status() {
        let err = WeatherError::Api {
            status: StatusCode::NOT_FOUND,
            message: "city not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("city not found"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn empty_city_prompts_for_input() {
        assert_eq!(WeatherError::EmptyCity.to_string(), "Enter City Name");
    }
}
