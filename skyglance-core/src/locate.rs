use crate::{Config, error::GeolocateError};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod ip_lookup;
pub mod reverse_geocode;

/// How the widget discovers where the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocateStrategy {
    /// Coordinates from IP geolocation, refined through a
    /// reverse-geocoding service. Needs a LocationIQ API key.
    ReverseGeocode,
    /// Take the city name straight from IP geolocation. No key.
    IpCity,
}

impl LocateStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocateStrategy::ReverseGeocode => "reverse-geocode",
            LocateStrategy::IpCity => "ip-city",
        }
    }

    pub const fn all() -> &'static [LocateStrategy] {
        &[LocateStrategy::ReverseGeocode, LocateStrategy::IpCity]
    }
}

impl std::fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LocateStrategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "reverse-geocode" => Ok(LocateStrategy::ReverseGeocode),
            "ip-city" => Ok(LocateStrategy::IpCity),
            _ => Err(anyhow::anyhow!(
                "Unknown location strategy '{value}'. Supported strategies: reverse-geocode, ip-city."
            )),
        }
    }
}

/// Resolves the user's current position to a place name usable as a
/// weather-query key.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn resolve(&self) -> Result<String, GeolocateError>;
}

/// Construct the configured geolocation strategy.
pub fn locator_from_config(config: &Config) -> anyhow::Result<Box<dyn Geolocator>> {
    let boxed: Box<dyn Geolocator> = match config.locate_strategy()? {
        LocateStrategy::ReverseGeocode => {
            let api_key = config.locationiq_key().ok_or_else(|| {
                anyhow::anyhow!(
                    "No LocationIQ API key configured for the reverse-geocode strategy.\n\
                         Hint: run `skyglance configure`, or set location_strategy = \"ip-city\"."
                )
            })?;
            Box::new(reverse_geocode::ReverseGeocodeLocator::new(api_key.to_owned()))
        }
        LocateStrategy::IpCity => Box::new(ip_lookup::IpCityLocator::new()),
    };

    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn strategy_as_str_roundtrip() {
        for strategy in LocateStrategy::all() {
            let parsed = LocateStrategy::try_from(strategy.as_str()).expect("roundtrip should succeed");
            assert_eq!(*strategy, parsed);
        }
    }

    #[test]
    fn unknown_strategy_error() {
        let err = LocateStrategy::try_from("dowsing-rod").unwrap_err();
        assert!(err.to_string().contains("Unknown location strategy"));
    }

    #[test]
    fn locator_from_config_defaults_to_ip_city_without_a_key() {
        let cfg = Config::default();
        let locator = locator_from_config(&cfg);
        assert!(locator.is_ok());
    }

    #[test]
    fn reverse_geocode_strategy_requires_a_key() {
        let cfg = Config {
            location_strategy: Some("reverse-geocode".to_string()),
            ..Config::default()
        };
        let err = locator_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No LocationIQ API key configured"));
    }

    #[test]
    fn configured_key_selects_reverse_geocode() {
        let mut cfg = Config::default();
        cfg.set_key(Config::LOCATIONIQ, "KEY".to_string());

        let locator = locator_from_config(&cfg);
        assert!(locator.is_ok());
    }
}
