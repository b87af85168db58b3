//! Model and schema info

use axum::{extract::State, Json};

use heartcheck_core::{EngineStatus, LayoutInfo};

use crate::AppState;

/// Loaded artifacts and latency stats
pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.status())
}

/// Input schema: field order, labels, domains and layout hash
pub async fn features() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
