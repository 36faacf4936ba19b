use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::error;

use crate::{dto::SyncStatusResponse, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reconciler/apply", post(apply_now))
        .route("/reconciler/status", get(get_sync_status))
}

async fn apply_now(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    match state.apply_now.execute().await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(error = %e, "manual apply failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn get_sync_status(State(state): State<AppState>) -> Json<SyncStatusResponse> {
    Json(state.get_sync_status.execute().await.into())
}
