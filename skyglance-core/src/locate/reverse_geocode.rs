use reqwest::Client;
use serde::Deserialize;

use async_trait::async_trait;

use crate::error::{GeolocateError, truncate_body};

use super::{Geolocator, ip_lookup};

const DEFAULT_COORDS_URL: &str = "http://ip-api.com";
const DEFAULT_GEOCODE_URL: &str = "https://us1.locationiq.com/v1";

/// The full strategy: coordinates from IP geolocation, refined to a
/// neighbourhood-level name through a reverse-geocoding service.
#[derive(Debug, Clone)]
pub struct ReverseGeocodeLocator {
    api_key: String,
    coords_url: String,
    geocode_url: String,
    http: Client,
}

impl ReverseGeocodeLocator {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(
            api_key,
            DEFAULT_COORDS_URL.to_string(),
            DEFAULT_GEOCODE_URL.to_string(),
        )
    }

    /// Endpoint roots are injectable so tests can stand in a local
    /// mock server for both services.
    pub fn with_endpoints(api_key: String, coords_url: String, geocode_url: String) -> Self {
        Self { api_key, coords_url, geocode_url, http: Client::new() }
    }

    async fn current_coords(&self) -> Result<(f64, f64), GeolocateError> {
        let response = ip_lookup::lookup(&self.http, &self.coords_url).await?;

        match (response.lat, response.lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(GeolocateError::DataShape("response carried no coordinates".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseAddress {
    suburb: Option<String>,
    county: Option<String>,
    neighbourhood: Option<String>,
    city: Option<String>,
}

// Priority: suburb, then county, then neighbourhood, then city.
fn pick_place(address: ReverseAddress) -> Option<String> {
    address
        .suburb
        .or(address.county)
        .or(address.neighbourhood)
        .or(address.city)
        .filter(|place| !place.is_empty())
}

#[async_trait]
impl Geolocator for ReverseGeocodeLocator {
    async fn resolve(&self) -> Result<String, GeolocateError> {
        let (lat, lon) = self.current_coords().await?;
        tracing::debug!(lat, lon, "reverse geocoding current coordinates");

        let url = format!("{}/reverse.php", self.geocode_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("format", "json")])
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await
            .map_err(|e| GeolocateError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| GeolocateError::Network(e.to_string()))?;

        // 401/403 is the key being rejected: the terminal analogue of
        // a denied location permission.
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GeolocateError::Permission(truncate_body(&body)));
        }
        if !status.is_success() {
            return Err(GeolocateError::Provider {
                status: status.as_u16(),
                detail: truncate_body(&body),
            });
        }

        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeolocateError::DataShape(e.to_string()))?;

        let place = parsed
            .address
            .and_then(pick_place)
            .ok_or_else(|| {
                GeolocateError::DataShape("address carried none of the expected place fields".to_string())
            })?;

        tracing::info!(%place, "reverse geocoded current position");
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(
        suburb: Option<&str>,
        county: Option<&str>,
        neighbourhood: Option<&str>,
        city: Option<&str>,
    ) -> ReverseAddress {
        ReverseAddress {
            suburb: suburb.map(str::to_string),
            county: county.map(str::to_string),
            neighbourhood: neighbourhood.map(str::to_string),
            city: city.map(str::to_string),
        }
    }

    #[test]
    fn suburb_wins_over_everything() {
        let picked = pick_place(address(Some("Leith"), Some("Midlothian"), Some("Shore"), Some("Edinburgh")));
        assert_eq!(picked.as_deref(), Some("Leith"));
    }

    #[test]
    fn county_beats_neighbourhood_and_city() {
        let picked = pick_place(address(None, Some("Midlothian"), Some("Shore"), Some("Edinburgh")));
        assert_eq!(picked.as_deref(), Some("Midlothian"));
    }

    #[test]
    fn neighbourhood_beats_city() {
        let picked = pick_place(address(None, None, Some("Shore"), Some("Edinburgh")));
        assert_eq!(picked.as_deref(), Some("Shore"));
    }

    #[test]
    fn city_is_the_last_resort() {
        let picked = pick_place(address(None, None, None, Some("Edinburgh")));
        assert_eq!(picked.as_deref(), Some("Edinburgh"));
    }

    #[test]
    fn empty_address_yields_nothing() {
        assert_eq!(pick_place(ReverseAddress::default()), None);
    }
}
