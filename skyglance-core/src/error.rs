//! Error taxonomy for the two request-issuing components.
//!
//! Every failure is caught at the call site that issued the request
//! and classified into a [`Failure`] for display; nothing here is
//! ever allowed to propagate out of the event loop.

use thiserror::Error;

use crate::model::Failure;

/// Failures of a weather fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather request failed: {0}")]
    Network(String),

    #[error("weather provider returned HTTP {status}: {detail}")]
    Provider { status: u16, detail: String },

    #[error("unexpected weather payload: {0}")]
    DataShape(String),
}

/// Failures of location resolution, at either the coordinate or the
/// reverse-geocoding stage.
#[derive(Debug, Error)]
pub enum GeolocateError {
    #[error("location access denied: {0}")]
    Permission(String),

    #[error("location request failed: {0}")]
    Network(String),

    #[error("geocoder returned HTTP {status}: {detail}")]
    Provider { status: u16, detail: String },

    #[error("unexpected geocoder payload: {0}")]
    DataShape(String),
}

impl From<&FetchError> for Failure {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Network(_) => Failure::NoConnection,
            // The weather endpoint answers an unrecognized place name with 404.
            FetchError::Provider { status: 404, .. } => Failure::UnknownPlace,
            FetchError::Provider { status, detail } => {
                Failure::Other(format!("HTTP {status}: {detail}"))
            }
            FetchError::DataShape(detail) => Failure::Other(detail.clone()),
        }
    }
}

impl From<&GeolocateError> for Failure {
    fn from(err: &GeolocateError) -> Self {
        match err {
            GeolocateError::Network(_) => Failure::NoConnection,
            GeolocateError::Permission(detail) => {
                Failure::Other(format!("location access denied: {detail}"))
            }
            GeolocateError::Provider { status, detail } => {
                Failure::Other(format!("HTTP {status}: {detail}"))
            }
            GeolocateError::DataShape(detail) => Failure::Other(detail.clone()),
        }
    }
}

/// Keep provider error bodies short enough to show in a status line.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
