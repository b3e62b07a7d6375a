//! The interactive widget: one event loop owning the view state.
//!
//! Keystrokes are polled from crossterm; fetch completions and timer
//! ticks arrive over an mpsc channel. Fetches are fire-and-forget
//! tasks tagged with the intent they were issued for; the reducer
//! drops any completion that no longer matches current intent, so a
//! slow response cannot clobber a newer one.

use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use skyglance_core::{
    Config, Effect, Event, FetchError, FetchTag, GeolocateError, Geolocator, UnitSystem,
    ViewState, WeatherProvider, WeatherReading, locate, weather,
};
use tokio::sync::mpsc;

use crate::render;

/// Messages delivered to the event loop from spawned tasks.
#[derive(Debug)]
enum Msg {
    Located(Result<String, GeolocateError>),
    Weather(FetchTag, Result<WeatherReading, FetchError>),
    Tick,
}

pub async fn run(config: &Config, unit: UnitSystem, initial_place: Option<String>) -> Result<()> {
    let provider: Arc<dyn WeatherProvider> = weather::provider_from_config(config)?.into();
    let locator: Arc<dyn Geolocator> = locate::locator_from_config(config)?.into();

    let (tx, mut rx) = mpsc::channel::<Msg>(16);

    // The periodic refresher only sends ticks; the fetch intent is
    // read by the reducer at fire time, never captured here.
    let ticker = spawn_ticker(tx.clone(), config.refresh_interval());

    let mut state = ViewState::new(unit);
    match initial_place {
        Some(place) => {
            // A place was given up front: arm the machine as usual but
            // feed it the answer instead of asking the geolocator.
            let _ = state.apply(Event::Started);
            dispatch_apply(&mut state, Event::LocationResolved(place), &tx, &provider, &locator);
        }
        None => {
            dispatch_apply(&mut state, Event::Started, &tx, &provider, &locator);
        }
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let result = event_loop(&mut state, &tx, &mut rx, &provider, &locator, &mut stdout).await;

    // Release the timer together with the widget.
    ticker.abort();

    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn spawn_ticker(tx: mpsc::Sender<Msg>, every: Duration) -> tokio::task::JoinHandle<()> {
    tracing::debug!(?every, "starting periodic refresh");
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(every);
        // The first tick of an interval fires immediately; the widget
        // already fetches on start, so skip it.
        timer.tick().await;
        loop {
            timer.tick().await;
            if tx.send(Msg::Tick).await.is_err() {
                break;
            }
        }
    })
}

async fn event_loop(
    state: &mut ViewState,
    tx: &mpsc::Sender<Msg>,
    rx: &mut mpsc::Receiver<Msg>,
    provider: &Arc<dyn WeatherProvider>,
    locator: &Arc<dyn Geolocator>,
    stdout: &mut io::Stdout,
) -> Result<()> {
    loop {
        draw(stdout, state)?;

        // Drain completions from spawned tasks and the ticker.
        while let Ok(msg) = rx.try_recv() {
            let event = match msg {
                Msg::Located(Ok(place)) => Event::LocationResolved(place),
                Msg::Located(Err(err)) => Event::LocationFailed(err),
                Msg::Weather(tag, Ok(reading)) => Event::WeatherArrived(tag, reading),
                Msg::Weather(tag, Err(err)) => Event::WeatherFailed(tag, err),
                Msg::Tick => Event::TimerFired,
            };
            dispatch_apply(state, event, tx, provider, locator);
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => break,
            KeyCode::Char('c') if ctrl => break,
            KeyCode::Char('u') if ctrl => {
                dispatch_apply(state, Event::UnitToggled, tx, provider, locator);
            }
            KeyCode::Char('l') if ctrl => {
                dispatch_apply(state, Event::UseCurrentLocation, tx, provider, locator);
            }
            KeyCode::Enter => {
                dispatch_apply(state, Event::SearchSubmitted, tx, provider, locator);
            }
            KeyCode::Backspace => {
                let mut draft = state.draft().to_string();
                draft.pop();
                dispatch_apply(state, Event::DraftEdited(draft), tx, provider, locator);
            }
            KeyCode::Char(c) if !ctrl => {
                let mut draft = state.draft().to_string();
                draft.push(c);
                dispatch_apply(state, Event::DraftEdited(draft), tx, provider, locator);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Feed one event to the reducer and execute whatever effect it asks for.
fn dispatch_apply(
    state: &mut ViewState,
    event: Event,
    tx: &mpsc::Sender<Msg>,
    provider: &Arc<dyn WeatherProvider>,
    locator: &Arc<dyn Geolocator>,
) {
    if let Some(effect) = state.apply(event) {
        spawn_effect(effect, tx, provider, locator);
    }
}

fn spawn_effect(
    effect: Effect,
    tx: &mpsc::Sender<Msg>,
    provider: &Arc<dyn WeatherProvider>,
    locator: &Arc<dyn Geolocator>,
) {
    match effect {
        Effect::ResolveLocation => {
            let locator = Arc::clone(locator);
            let tx = tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(Msg::Located(locator.resolve().await)).await;
            });
        }
        Effect::FetchWeather(tag) => {
            let provider = Arc::clone(provider);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = provider.fetch(&tag.place, tag.unit).await;
                let _ = tx.send(Msg::Weather(tag, result)).await;
            });
        }
    }
}

fn draw(stdout: &mut io::Stdout, state: &ViewState) -> Result<()> {
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    for line in render::frame_lines(state) {
        // Raw mode needs explicit carriage returns.
        write!(stdout, "{line}\r\n")?;
    }
    stdout.flush()?;
    Ok(())
}
