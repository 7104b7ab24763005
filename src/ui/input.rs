use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

use super::UiEvent;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    /// 1-based index into the preset cities
    Pick(usize),
    Cities,
    Recent,
    History,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        ":q" | ":quit" | ":exit" => Command::Quit,
        ":c" | ":cities" => Command::Cities,
        ":r" | ":recent" => Command::Recent,
        ":h" | ":history" => Command::History,
        ":?" | ":help" => Command::Help,
        _ => match line.parse::<usize>() {
            Ok(index) => Command::Pick(index),
            Err(_) => Command::Search(line.to_string()),
        },
    }
}

/// Forward stdin lines to the display loop until EOF or the loop goes away
pub fn spawn_stdin_reader(events: UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let command = match lines.next_line().await {
                Ok(Some(line)) => parse_command(&line),
                Ok(None) => Command::Quit,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read input");
                    Command::Quit
                }
            };

            let quit = command == Command::Quit;
            if events.send(UiEvent::Input(command)).is_err() || quit {
                break;
            }
        }
    })
}
