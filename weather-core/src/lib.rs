//! Core library for the `weather` city-card CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and the condition-code -> icon mapping
//! - Geolocation of the user's city
//! - City cards loaded concurrently, each failing on its own
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod geo;
pub mod icon;
pub mod model;
pub mod provider;

pub use config::{Config, Endpoints};
pub use dashboard::Dashboard;
pub use error::WeatherError;
pub use geo::{Geolocator, HttpGeolocator, resolve_city};
pub use icon::Icon;
pub use model::{Card, CardState, Coordinates, WeatherReport, WeatherRequest};
pub use provider::{WeatherProvider, provider_from_config};
