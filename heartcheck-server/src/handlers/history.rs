//! Prediction history handlers

use axum::{http::StatusCode, response::Response, Json};

use heartcheck_core::constants::{HISTORY_FILENAME, HISTORY_MIME};
use heartcheck_core::HistoryEntry;

use super::reports::attachment;
use crate::middleware::auth::UserContext;

/// Entries, newest first
pub async fn list(user: UserContext) -> Json<Vec<HistoryEntry>> {
    Json(user.session.lock().history().entries())
}

/// CSV download of the session history
pub async fn export(user: UserContext) -> Response {
    let csv = user.session.lock().export_history_csv();
    attachment(HISTORY_MIME, HISTORY_FILENAME, csv)
}

pub async fn clear(user: UserContext) -> StatusCode {
    user.session.lock().clear_history();
    tracing::debug!("History cleared for {}", user.username);
    StatusCode::NO_CONTENT
}
