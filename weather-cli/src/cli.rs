use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use tracing::info;
use weather_core::{
    Config, Coordinates, Dashboard, HttpGeolocator, provider_from_config, resolve_city,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather as city cards")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default cities.
    Configure,

    /// Show a card for each city (default cities if none given).
    Show {
        /// City names, e.g. `London "New York"`.
        cities: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the card for the city you are in.
    Here {
        /// Latitude; skips the IP-based lookup when given with --lon.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List condition codes and the icon each maps to.
    Icons,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Print cards as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { cities, output } => {
                let config = Config::load()?;
                let cities = if cities.is_empty() { config.cities_or_fallback() } else { cities };
                show(&config, cities, &output).await
            }
            Command::Here { lat, lon, output } => {
                let config = Config::load()?;
                let coords = match (lat, lon) {
                    (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
                    _ => None,
                };
                let geolocator = HttpGeolocator::from_config(&config)?;
                let city = resolve_city(&geolocator, coords).await?;
                info!(%city, "resolved current city");
                show(&config, vec![city], &output).await
            }
            Command::Icons => {
                print!("{}", render::icon_table());
                Ok(())
            }
        }
    }
}

async fn show(config: &Config, cities: Vec<String>, output: &OutputArgs) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let dashboard = Dashboard::load(provider.as_ref(), cities).await;

    if output.json {
        println!("{}", render::json(dashboard.cards())?);
    } else {
        print!("{}", render::cards(dashboard.cards()));
    }

    if dashboard.loaded_count() == 0 {
        bail!("no weather could be loaded");
    }
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load()?;

    let has_key = config.api_key.is_some();
    let prompt = if has_key {
        "OpenWeather API key (leave empty to keep the current one):"
    } else {
        "OpenWeather API key:"
    };
    let key = Password::new(prompt)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() || !has_key {
        config.set_api_key(key);
    }

    let replace = config.default_cities.is_empty()
        || Confirm::new(&format!(
            "Replace default cities ({})?",
            config.default_cities.join(", ")
        ))
        .with_default(false)
        .prompt()
        .context("Failed to read answer")?;

    if replace {
        let input = Text::new("Default cities (comma separated):")
            .with_placeholder("London, Tokyo")
            .prompt()
            .context("Failed to read default cities")?;
        config.default_cities.clear();
        for city in input.split(',') {
            config.add_default_city(city);
        }
    }

    config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_multiple_cities() {
        let cli = Cli::try_parse_from(["weather", "show", "London", "New York", "--json"]).unwrap();
        match cli.command {
            Command::Show { cities, output } => {
                assert_eq!(cities, vec!["London".to_string(), "New York".to_string()]);
                assert!(output.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn here_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["weather", "here", "--lat", "-33.87", "--lon", "151.21"]).unwrap();
        match cli.command {
            Command::Here { lat, lon, .. } => {
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.21));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn here_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["weather", "here", "--lat", "10"]).is_err());
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["weather", "icons", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
