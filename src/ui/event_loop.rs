use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{Command, DisplaySurface, MessageLevel};
use crate::display::WeatherCard;
use crate::history::{HistoryLog, RecentSearches};
use crate::weather::{title_case, WeatherError, WeatherReading, WeatherSource};

const HELP: &str = "Type a city name, or a number to pick a preset city.\n\
                    :cities  list preset cities\n\
                    :recent  recently searched cities\n\
                    :history saved readings\n\
                    :quit    exit";

/// Everything the display loop reacts to
#[derive(Debug)]
pub enum UiEvent {
    Input(Command),
    /// A worker finished its lookup
    Completed {
        city: String,
        outcome: Result<WeatherReading, WeatherError>,
    },
}

/// Owns the surface and all display state. Lookups run on worker tasks and
/// report back over the channel; nothing else touches the surface.
pub struct DisplayLoop<S> {
    surface: S,
    source: Arc<dyn WeatherSource>,
    history: Arc<HistoryLog>,
    recent: RecentSearches,
    cities: Vec<String>,
    events_tx: UnboundedSender<UiEvent>,
    events_rx: UnboundedReceiver<UiEvent>,
    in_flight: usize,
    quitting: bool,
}

impl<S: DisplaySurface> DisplayLoop<S> {
    pub fn new(
        surface: S,
        source: Arc<dyn WeatherSource>,
        history: Arc<HistoryLog>,
        cities: Vec<String>,
        recent_limit: usize,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            surface,
            source,
            history,
            recent: RecentSearches::new(recent_limit),
            cities,
            events_tx,
            events_rx,
            in_flight: 0,
            quitting: false,
        }
    }

    /// Handle for feeding input into the loop
    pub fn sender(&self) -> UnboundedSender<UiEvent> {
        self.events_tx.clone()
    }

    /// Process events until asked to quit and every lookup has reported back.
    /// Returns the surface.
    pub async fn run(mut self) -> S {
        while !(self.quitting && self.in_flight == 0) {
            // The loop holds a sender itself, so recv never sees a closed channel
            let Some(event) = self.events_rx.recv().await else {
                break;
            };

            match event {
                UiEvent::Input(command) => self.handle_command(command).await,
                UiEvent::Completed { city, outcome } => self.complete(city, outcome).await,
            }
        }

        tracing::debug!("Display loop finished");
        self.surface
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Search(city) => self.search(city),
            Command::Pick(index) => {
                let picked = index
                    .checked_sub(1)
                    .and_then(|i| self.cities.get(i))
                    .cloned();
                match picked {
                    Some(city) => self.search(city),
                    None => self.surface.show_message(
                        MessageLevel::Warning,
                        &format!("No preset city numbered {index}"),
                    ),
                }
            }
            Command::Cities => self.surface.show_choices(&self.cities),
            Command::Recent => self.surface.show_recent(&self.recent.entries()),
            Command::History => {
                let entries = self.history.entries().await;
                self.surface.show_history(&entries);
            }
            Command::Help => self.surface.show_message(MessageLevel::Info, HELP),
            Command::Quit => self.quitting = true,
        }
    }

    /// Start a lookup on a worker. Earlier lookups are not cancelled; whichever
    /// finishes last is what stays on screen.
    fn search(&mut self, city: String) {
        let city = city.trim().to_string();
        if city.is_empty() {
            self.surface
                .show_message(MessageLevel::Warning, &WeatherError::InputInvalid.to_string());
            return;
        }

        self.surface.render(&WeatherCard::loading(&city));

        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = source.current(&city).await;
            // Send fails only once the loop is gone; nothing left to update then
            let _ = events.send(UiEvent::Completed { city, outcome });
        });
    }

    async fn complete(&mut self, city: String, outcome: Result<WeatherReading, WeatherError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.surface.render(&WeatherCard::from_outcome(&city, &outcome));

        match outcome {
            Ok(reading) => {
                self.recent.record(&title_case(&city));
                if let Err(e) = self
                    .history
                    .record(&reading.city, reading.temperature, &reading.description)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to save weather history");
                }
            }
            Err(WeatherError::NotFound(_)) => {
                tracing::info!(city = %city, "City not found");
                self.surface.show_message(
                    MessageLevel::Warning,
                    &format!("City not found: {}", title_case(&city)),
                );
            }
            Err(e) => {
                tracing::error!(city = %city, error = %e, "Weather lookup failed");
                self.surface.show_message(MessageLevel::Error, &e.to_string());
            }
        }
    }
}
