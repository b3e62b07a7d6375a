use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use skyglance_core::{Config, UnitSystem, weather};

use crate::{app, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyglance", version, about = "Weather at a glance, in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys and preferences interactively.
    Configure,

    /// Fetch and print current conditions for a place, then exit.
    Show {
        /// Place name, e.g. "London".
        place: String,

        /// Unit system: "metric" or "imperial". Defaults to the configured one.
        #[arg(long)]
        unit: Option<String>,
    },

    /// Run the interactive widget (the default when no command is given).
    Watch {
        /// Start with this place instead of geolocating.
        #[arg(long)]
        place: Option<String>,

        /// Unit system: "metric" or "imperial". Defaults to the configured one.
        #[arg(long)]
        unit: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let command = self.command.unwrap_or(Command::Watch { place: None, unit: None });

        match command {
            Command::Configure => configure(),
            Command::Show { place, unit } => show(&place, unit.as_deref()).await,
            Command::Watch { place, unit } => {
                let config = Config::load()?;
                let unit = resolve_unit(&config, unit.as_deref())?;
                app::run(&config, unit, place).await
            }
        }
    }
}

fn resolve_unit(config: &Config, flag: Option<&str>) -> Result<UnitSystem> {
    match flag {
        Some(s) => UnitSystem::try_from(s),
        None => Ok(config.unit),
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let openweather = Text::new("OpenWeather API key:")
        .with_help_message("https://openweathermap.org/api — required for weather data")
        .prompt()?;
    if !openweather.trim().is_empty() {
        config.set_key(Config::OPENWEATHER, openweather.trim().to_string());
    }

    let locationiq = Text::new("LocationIQ API key (leave empty to skip):")
        .with_help_message("Enables the reverse-geocode location strategy")
        .prompt()?;
    if !locationiq.trim().is_empty() {
        config.set_key(Config::LOCATIONIQ, locationiq.trim().to_string());
    }

    let unit = Select::new("Default unit system:", vec!["metric", "imperial"]).prompt()?;
    config.unit = UnitSystem::try_from(unit)?;

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(place: &str, unit_flag: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let unit = resolve_unit(&config, unit_flag)?;
    let provider = weather::provider_from_config(&config)?;

    let reading = provider.fetch(place, unit).await?;
    for line in render::reading_lines(&reading, unit) {
        println!("{line}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_flag_overrides_the_configured_default() {
        let config = Config::default();
        let unit = resolve_unit(&config, Some("imperial")).unwrap();
        assert_eq!(unit, UnitSystem::Imperial);
    }

    #[test]
    fn missing_flag_falls_back_to_config() {
        let config = Config { unit: UnitSystem::Imperial, ..Config::default() };
        let unit = resolve_unit(&config, None).unwrap();
        assert_eq!(unit, UnitSystem::Imperial);
    }

    #[test]
    fn bad_unit_flag_is_rejected() {
        let config = Config::default();
        assert!(resolve_unit(&config, Some("kelvin")).is_err());
    }
}
