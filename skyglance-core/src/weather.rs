use crate::{Config, error::FetchError, model::{UnitSystem, WeatherReading}};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Fetches current conditions for a place name in the given unit
/// system. Implemented by the OpenWeather client; the trait is the
/// seam test doubles plug into.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, place: &str, unit: UnitSystem) -> Result<WeatherReading, FetchError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.openweather_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skyglance configure` and enter your API key."
        )
    })?;

    Ok(Box::new(openweather::OpenWeatherClient::new(api_key.to_owned())))
}
