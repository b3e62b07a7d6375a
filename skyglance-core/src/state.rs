//! The view-state machine driving the fetch flow.
//!
//! The widget front-end feeds [`Event`]s in and executes the
//! [`Effect`] the reducer hands back; all transition rules live here,
//! where they can be tested without a terminal or a network.

use crate::error::{FetchError, GeolocateError};
use crate::model::{Failure, Status, UnitSystem, WeatherReading};

/// Where the widget currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Initial,
    AwaitingLocation,
    AwaitingWeather,
    Ready,
    Error,
}

/// Identity of one issued fetch: the intent it was created for plus a
/// sequence number. A completion whose tag is not the most recently
/// issued one answers a superseded request and is dropped, so a slow
/// response can never overwrite a newer one.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTag {
    pub seq: u64,
    pub place: String,
    pub unit: UnitSystem,
}

#[derive(Debug)]
pub enum Event {
    /// Widget mounted.
    Started,
    /// Geolocation produced a place name.
    LocationResolved(String),
    LocationFailed(GeolocateError),
    /// The search field changed. Never fetches.
    DraftEdited(String),
    /// Enter pressed (or the search affordance activated).
    SearchSubmitted,
    UnitToggled,
    /// Periodic refresh fired.
    TimerFired,
    /// The "use current location" affordance activated.
    UseCurrentLocation,
    WeatherArrived(FetchTag, WeatherReading),
    WeatherFailed(FetchTag, FetchError),
}

/// Side effect requested by the reducer; the event loop executes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ResolveLocation,
    FetchWeather(FetchTag),
}

#[derive(Debug)]
pub struct ViewState {
    phase: Phase,
    /// Committed place name used for fetches. Empty until resolved.
    place: String,
    /// Search field contents; committed on submit, never before.
    draft: String,
    unit: UnitSystem,
    reading: Option<WeatherReading>,
    status: Status,
    /// Armed by `Started`/`UseCurrentLocation` and consumed by the
    /// first resolution that follows. While disarmed, a resolved or
    /// edited location never starts a fetch on its own.
    auto_fetch_armed: bool,
    seq: u64,
}

impl ViewState {
    pub fn new(unit: UnitSystem) -> Self {
        Self {
            phase: Phase::Initial,
            place: String::new(),
            draft: String::new(),
            unit,
            reading: None,
            status: Status::Initial,
            auto_fetch_armed: false,
            seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn unit(&self) -> UnitSystem {
        self.unit
    }

    pub fn reading(&self) -> Option<&WeatherReading> {
        self.reading.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Advance the machine by one event, returning the effect the
    /// caller must execute, if any.
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Started | Event::UseCurrentLocation => {
                self.phase = Phase::AwaitingLocation;
                self.auto_fetch_armed = true;
                Some(Effect::ResolveLocation)
            }
            Event::LocationResolved(place) => {
                self.place = place;
                self.draft.clear();
                if self.auto_fetch_armed {
                    self.auto_fetch_armed = false;
                    Some(self.begin_fetch())
                } else {
                    None
                }
            }
            Event::LocationFailed(err) => {
                self.auto_fetch_armed = false;
                self.fail(Failure::from(&err));
                None
            }
            Event::DraftEdited(draft) => {
                self.draft = draft;
                None
            }
            Event::SearchSubmitted => {
                if !self.draft.is_empty() {
                    self.place = std::mem::take(&mut self.draft);
                }
                // Submitting an empty draft re-fetches the current
                // place; with no place at all there is nothing to do.
                if self.place.is_empty() {
                    return None;
                }
                Some(self.begin_fetch())
            }
            Event::UnitToggled => {
                self.unit = self.unit.toggle();
                if self.place.is_empty() { None } else { Some(self.begin_fetch()) }
            }
            Event::TimerFired => {
                // The timer task carries no state of its own; the
                // fetch intent is read here, at fire time.
                if self.place.is_empty() { None } else { Some(self.begin_fetch()) }
            }
            Event::WeatherArrived(tag, reading) => {
                if tag.seq != self.seq {
                    tracing::debug!(stale = tag.seq, current = self.seq, "dropping stale reading");
                    return None;
                }
                self.reading = Some(reading);
                self.status = Status::Ok;
                self.phase = Phase::Ready;
                None
            }
            Event::WeatherFailed(tag, err) => {
                if tag.seq != self.seq {
                    tracing::debug!(stale = tag.seq, current = self.seq, "dropping stale failure");
                    return None;
                }
                self.fail(Failure::from(&err));
                None
            }
        }
    }

    fn begin_fetch(&mut self) -> Effect {
        self.seq += 1;
        self.phase = Phase::AwaitingWeather;
        Effect::FetchWeather(FetchTag {
            seq: self.seq,
            place: self.place.clone(),
            unit: self.unit,
        })
    }

    fn fail(&mut self, failure: Failure) {
        // A reading is only valid under Status::Ok; clear it first.
        self.reading = None;
        self.status = Status::Failed(failure);
        self.phase = Phase::Error;
    }
}
