use std::io::{self, Write};

use super::{DisplaySurface, MessageLevel};
use crate::display::WeatherCard;
use crate::history::HistoryEntry;
use crate::theme::hex_to_rgb;

const CARD_WIDTH: usize = 36;
const RESET: &str = "\x1b[0m";

/// Draws cards as boxed blocks on a terminal, colored by the card's theme
pub struct TerminalSurface<W> {
    out: W,
    color: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_card(&mut self, card: &WeatherCard) -> io::Result<()> {
        let style = if self.color {
            match (hex_to_rgb(card.theme.background), hex_to_rgb(card.theme.foreground)) {
                (Some((br, bg, bb)), Some((fr, fg, fb))) => {
                    format!("\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m")
                }
                _ => String::new(),
            }
        } else {
            String::new()
        };
        let reset = if style.is_empty() { "" } else { RESET };

        let mut lines = vec![
            String::new(),
            format!("{}  {}", card.theme.glyph, card.city),
            card.description.clone(),
            card.temperature.clone(),
            String::new(),
        ];
        if !card.details.is_empty() {
            lines.extend(card.details.iter().cloned());
            lines.push(String::new());
        }

        writeln!(self.out)?;
        for line in lines {
            writeln!(self.out, "{style}  {}{reset}", pad(&line, CARD_WIDTH))?;
        }
        self.out.flush()
    }

    fn draw_message(&mut self, level: MessageLevel, text: &str) -> io::Result<()> {
        let label = match level {
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        };
        writeln!(self.out, "[{label}] {text}")?;
        self.out.flush()
    }

    fn draw_list(&mut self, title: &str, items: &[String]) -> io::Result<()> {
        writeln!(self.out, "{title}:")?;
        if items.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for item in items {
            writeln!(self.out, "  {item}")?;
        }
        self.out.flush()
    }

    fn report(result: io::Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn render(&mut self, card: &WeatherCard) {
        let result = self.draw_card(card);
        Self::report(result);
    }

    fn show_message(&mut self, level: MessageLevel, text: &str) {
        let result = self.draw_message(level, text);
        Self::report(result);
    }

    fn show_choices(&mut self, cities: &[String]) {
        let numbered: Vec<String> = cities
            .iter()
            .enumerate()
            .map(|(i, city)| format!("{}. {}", i + 1, city))
            .collect();
        let result = self.draw_list("Cities", &numbered);
        Self::report(result);
    }

    fn show_recent(&mut self, cities: &[String]) {
        let result = self.draw_list("Recent searches", cities);
        Self::report(result);
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        let lines: Vec<String> = entries
            .iter()
            .rev()
            .map(|e| {
                format!(
                    "{}  {}  {:.1}°C  {}",
                    e.timestamp, e.city, e.temperature, e.description
                )
            })
            .collect();
        let result = self.draw_list("History (newest first)", &lines);
        Self::report(result);
    }
}

/// Right-pad to `width` characters so colored backgrounds form a block
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
