//! Pure rendering of the view state into terminal lines.
//!
//! Free functions over borrowed state, no I/O: everything here is
//! testable by asserting on the returned lines.

use chrono::Local;
use skyglance_core::{Failure, Phase, Status, UnitSystem, ViewState, WeatherReading};

/// Render one full frame of the widget.
pub fn frame_lines(state: &ViewState) -> Vec<String> {
    let mut lines = vec![format!("Search: {}_", state.draft()), String::new()];

    match (state.phase(), state.status()) {
        (Phase::AwaitingLocation, _) => lines.push("Finding your location...".to_string()),
        (Phase::AwaitingWeather, _) => {
            lines.push(format!("Fetching weather for {}...", state.place()));
        }
        (_, Status::Failed(failure)) => lines.push(prompt_for(failure)),
        _ => {}
    }

    if let Some(reading) = state.reading() {
        lines.push(String::new());
        lines.extend(reading_lines(reading, state.unit()));
    }

    lines.push(String::new());
    lines.push(
        "[Enter] search   [^U] units   [^L] my location   [Esc] quit".to_string(),
    );

    lines
}

fn prompt_for(failure: &Failure) -> String {
    match failure {
        Failure::NoConnection => "No connection. Check your network and try again.".to_string(),
        Failure::UnknownPlace => {
            "No weather for that place. Check the spelling and search again.".to_string()
        }
        Failure::Other(detail) => format!("Something went wrong: {detail}"),
    }
}

/// Render one reading. A field the provider did not report produces
/// no line at all.
pub fn reading_lines(reading: &WeatherReading, unit: UnitSystem) -> Vec<String> {
    let mut lines = vec![reading.place.clone()];

    let mut headline = format!("{:.0}{}", reading.temperature, unit.temp_suffix());
    if let Some(condition) = &reading.condition {
        headline.push_str("  ");
        headline.push_str(condition);
    }
    lines.push(headline);

    if let Some(feels_like) = reading.feels_like {
        lines.push(format!("Feels like {:.0}{}", feels_like, unit.temp_suffix()));
    }
    if let Some(speed) = reading.wind_speed {
        let mut wind = format!("Wind {speed} {}", unit.speed_suffix());
        if let Some(gust) = reading.wind_gust {
            wind.push_str(&format!(", gusts {gust} {}", unit.speed_suffix()));
        }
        lines.push(wind);
    }
    if let Some(humidity) = reading.humidity {
        lines.push(format!("Humidity {humidity}%"));
    }
    if let Some(pressure) = reading.pressure {
        lines.push(format!("Pressure {pressure} hPa"));
    }

    lines.push(format!(
        "Updated {}",
        reading.observed_at.with_timezone(&Local).format("%H:%M")
    ));

    lines
}
