//! Deployment facts the browser needs before rendering privileged controls.

use axum::extract::State;
use axum::response::Json;
use threads::permissions::SessionInfo;

use crate::state::AppState;

/// `GET /api/session`: the configured access role.
pub async fn session_info(State(state): State<AppState>) -> Json<SessionInfo> {
    Json(SessionInfo { role: state.config.role })
}
