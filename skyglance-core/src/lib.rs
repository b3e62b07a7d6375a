//! Core library for the `skyglance` weather widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geolocation strategies and the weather fetcher
//! - The view-state machine that drives the widget
//!
//! It is used by `skyglance-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod locate;
pub mod model;
pub mod state;
pub mod weather;

pub use config::Config;
pub use error::{FetchError, GeolocateError};
pub use locate::{Geolocator, LocateStrategy};
pub use model::{Failure, Status, UnitSystem, WeatherReading};
pub use state::{Effect, Event, FetchTag, Phase, ViewState};
pub use weather::WeatherProvider;
