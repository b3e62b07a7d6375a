use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system for temperature and wind speed.
///
/// The string form doubles as the `units` query value the weather
/// endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temp_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// One normalized weather snapshot for a place/unit pair.
///
/// A `None` field means the provider did not report it for this
/// location and conditions; the renderer drops the line rather than
/// showing a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub place: String,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub condition: Option<String>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub humidity: Option<u8>,
    pub pressure: Option<u32>,
    pub observed_at: DateTime<Utc>,
}

/// User-facing outcome of the most recent operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Initial,
    Ok,
    Failed(Failure),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// Classified failure detail behind [`Status::Failed`].
///
/// `NoConnection` and `UnknownPlace` each get their own prompt;
/// everything else falls back to a generic message carrying the
/// HTTP status code when one was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    NoConnection,
    UnknownPlace,
    Other(String),
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::NoConnection => f.write_str("no connection"),
            Failure::UnknownPlace => f.write_str("unknown place"),
            Failure::Other(detail) => f.write_str(detail),
        }
    }
}
