pub mod handlers;
mod log;
mod recent;

use thiserror::Error;

pub use self::log::{HistoryEntry, HistoryLog};
pub use recent::RecentSearches;

/// Failure to persist the history file; callers log it and carry on
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
