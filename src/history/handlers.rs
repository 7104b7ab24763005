use axum::{extract::State, Json};

use super::HistoryEntry;
use crate::AppState;

/// Past readings, oldest first
///
/// GET /history
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.entries().await)
}

/// Recently searched cities, most recent first
///
/// GET /searches
pub async fn get_searches(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.recent.lock().await.entries())
}
