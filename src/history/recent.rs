use serde::Serialize;
use std::collections::VecDeque;

/// Most-recent-first list of searched cities with a fixed capacity
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RecentSearches {
    entries: VecDeque<String>,
    #[serde(skip)]
    capacity: usize,
}

impl RecentSearches {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Put `city` at the front. A city already in the list is left where it
    /// is. Returns whether the list changed.
    pub fn record(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() || self.entries.iter().any(|c| c == city) {
            return false;
        }

        self.entries.push_front(city.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
