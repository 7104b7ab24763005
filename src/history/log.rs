use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::HistoryError;

/// One past reading as kept on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub timestamp: String,
}

/// Capped JSON array of past readings, rewritten wholesale on every append
pub struct HistoryLog {
    path: PathBuf,
    limit: usize,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a reading, keeping only the newest `limit` entries
    pub async fn record(
        &self,
        city: &str,
        temperature: f64,
        description: &str,
    ) -> Result<HistoryEntry, HistoryError> {
        let _guard = self.lock.lock().await;

        let entry = HistoryEntry {
            city: city.to_string(),
            temperature,
            description: description.to_string(),
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        };

        let mut entries = self.read().await;
        entries.push(entry.clone());
        if entries.len() > self.limit {
            let excess = entries.len() - self.limit;
            entries.drain(..excess);
        }

        self.write(&entries).await?;
        tracing::debug!(city = %city, count = entries.len(), "Saved weather history");

        Ok(entry)
    }

    /// All entries, oldest first
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Missing or unreadable files count as an empty history
    async fn read(&self) -> Vec<HistoryEntry> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "History file does not exist, starting fresh");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read history file, starting fresh");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "History file is corrupt, starting fresh");
                Vec::new()
            }
        }
    }

    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let content = serde_json::to_string_pretty(entries)?;

        // Create parent directory if needed
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}
