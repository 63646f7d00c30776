//! Finding the user's city: an IP-based position lookup followed by a
//! reverse geocode of the coordinates into a city name.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    Config, WeatherError,
    model::Coordinates,
    provider::{http_client, join_url, truncate_body},
};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Approximate position of the machine running the CLI.
    async fn locate(&self) -> Result<Coordinates, WeatherError>;

    /// Name of the city at `coords`.
    async fn city_name(&self, coords: Coordinates) -> Result<String, WeatherError>;
}

/// Resolve the city to show: reverse-geocode `coords` if given, otherwise
/// locate the machine first.
pub async fn resolve_city(
    geolocator: &dyn Geolocator,
    coords: Option<Coordinates>,
) -> Result<String, WeatherError> {
    let coords = match coords {
        Some(c) => c,
        None => geolocator.locate().await?,
    };
    debug!(lat = coords.latitude, lon = coords.longitude, "reverse geocoding");

    let city = geolocator.city_name(coords).await?;
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::Geolocation(format!(
            "no city found near {:.4}, {:.4}",
            coords.latitude, coords.longitude
        )));
    }
    Ok(city.to_string())
}

/// ip-api.com for the position, BigDataCloud for the reverse lookup.
#[derive(Debug, Clone)]
pub struct HttpGeolocator {
    ip_lookup_url: String,
    reverse_geocode_url: String,
    http: Client,
}

impl HttpGeolocator {
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self {
            ip_lookup_url: config.endpoints.ip_lookup.clone(),
            reverse_geocode_url: config.endpoints.reverse_geocode.clone(),
            http: http_client(config)?,
        })
    }

    async fn get_text(&self, req: reqwest::RequestBuilder, what: &str) -> Result<String, WeatherError> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Geolocation(format!(
                "{what} failed with status {status}: {}",
                truncate_body(&body)
            )));
        }
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseGeocodeResponse {
    #[serde(default)]
    city: String,
    #[serde(default)]
    locality: String,
    #[serde(default)]
    principal_subdivision: String,
}

pub fn parse_ip_lookup(body: &str) -> Result<Coordinates, WeatherError> {
    let parsed: IpApiResponse = serde_json::from_str(body)?;

    if parsed.status != "success" {
        let reason = parsed.message.unwrap_or_else(|| parsed.status.clone());
        return Err(WeatherError::Geolocation(format!("IP lookup failed: {reason}")));
    }

    match (parsed.lat, parsed.lon) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
        _ => Err(WeatherError::Geolocation("IP lookup returned no coordinates".to_string())),
    }
}

/// First non-blank of city, locality, principal subdivision.
pub fn parse_reverse_geocode(body: &str) -> Result<String, WeatherError> {
    let parsed: ReverseGeocodeResponse = serde_json::from_str(body)?;

    [parsed.city, parsed.locality, parsed.principal_subdivision]
        .into_iter()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .ok_or_else(|| WeatherError::Geolocation("reverse geocoding returned no place name".to_string()))
}

#[async_trait]
impl Geolocator for HttpGeolocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let url = join_url(&self.ip_lookup_url, "json");
        let req = self.http.get(&url).query(&[("fields", "status,message,lat,lon")]);
        let body = self.get_text(req, "IP lookup").await?;
        parse_ip_lookup(&body)
    }

    async fn city_name(&self, coords: Coordinates) -> Result<String, WeatherError> {
        let url = join_url(&self.reverse_geocode_url, "data/reverse-geocode-client");
        let req = self.http.get(&url).query(&[
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("localityLanguage", "en".to_string()),
        ]);
        let body = self.get_text(req, "Reverse geocoding").await?;
        parse_reverse_geocode(&body)
    }
}
