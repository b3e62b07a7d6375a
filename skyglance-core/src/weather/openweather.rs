use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use async_trait::async_trait;

use crate::{
    error::{FetchError, truncate_body},
    model::{UnitSystem, WeatherReading},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint root. Tests use this
    /// with a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

// The wind block, and every field inside it, may be missing for some
// locations and conditions. Nothing here is accessed unconditionally.
#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    dt: Option<i64>,
}

fn reading_from_response(parsed: OwResponse) -> WeatherReading {
    let observed_at = parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);
    let (wind_speed, wind_gust) = parsed.wind.map_or((None, None), |w| (w.speed, w.gust));

    WeatherReading {
        place: parsed.name,
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        condition: parsed.weather.first().map(|w| w.main.clone()),
        wind_speed,
        wind_gust,
        humidity: parsed.main.humidity,
        pressure: parsed.main.pressure,
        observed_at,
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, place: &str, unit: UnitSystem) -> Result<WeatherReading, FetchError> {
        let url = format!("{}/weather", self.base_url);

        tracing::debug!(%place, %unit, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("units", unit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Provider {
                status: status.as_u16(),
                detail: truncate_body(&body),
            });
        }

        let parsed: OwResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::DataShape(e.to_string()))?;

        Ok(reading_from_response(parsed))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
