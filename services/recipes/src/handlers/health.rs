use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "database not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
