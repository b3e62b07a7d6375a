use reqwest::Client;
use serde::Deserialize;

use async_trait::async_trait;

use crate::error::{GeolocateError, truncate_body};

use super::Geolocator;

const DEFAULT_BASE_URL: &str = "http://ip-api.com";

/// The simple strategy: ask the IP-geolocation service for a city
/// name and use it as-is.
#[derive(Debug, Clone)]
pub struct IpCityLocator {
    base_url: String,
    http: Client,
}

impl Default for IpCityLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IpCityLocator {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IpResponse {
    pub(crate) city: Option<String>,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
}

/// One GET against the `/json` endpoint, shared by both strategies.
pub(crate) async fn lookup(http: &Client, base_url: &str) -> Result<IpResponse, GeolocateError> {
    let url = format!("{base_url}/json");

    let res = http
        .get(&url)
        .send()
        .await
        .map_err(|e| GeolocateError::Network(e.to_string()))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| GeolocateError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(GeolocateError::Provider {
            status: status.as_u16(),
            detail: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| GeolocateError::DataShape(e.to_string()))
}

#[async_trait]
impl Geolocator for IpCityLocator {
    async fn resolve(&self) -> Result<String, GeolocateError> {
        let response = lookup(&self.http, &self.base_url).await?;

        let city = response
            .city
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GeolocateError::DataShape("response carried no city".to_string()))?;

        tracing::info!(%city, "resolved current position from IP");
        Ok(city)
    }
}
