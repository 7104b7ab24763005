mod event_loop;
mod input;
mod terminal;

pub use event_loop::{DisplayLoop, UiEvent};
pub use input::{spawn_stdin_reader, Command};
pub use terminal::TerminalSurface;

use crate::display::WeatherCard;
use crate::history::HistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Where cards and messages end up. Only the display loop calls these, so
/// implementations need no synchronization of their own.
pub trait DisplaySurface {
    /// Replace whatever card is showing
    fn render(&mut self, card: &WeatherCard);

    /// Modal-style notice
    fn show_message(&mut self, level: MessageLevel, text: &str);

    /// Numbered preset cities
    fn show_choices(&mut self, cities: &[String]);

    fn show_recent(&mut self, cities: &[String]);

    fn show_history(&mut self, entries: &[HistoryEntry]);
}
