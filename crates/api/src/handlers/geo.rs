use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use meshsentry_application::ports::UpdateSelector;
use tracing::error;

use crate::{
    dto::{RefreshZonesResponse, UpdateSelectorQuery},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/geo/countries/{code}", post(block_country).delete(unblock_country))
        .route("/geo/refresh", post(refresh_zones))
        .route("/geo/update", post(trigger_update))
}

fn parse_selector(raw: &str) -> Result<UpdateSelector, (StatusCode, String)> {
    match raw {
        "all" => Ok(UpdateSelector::All),
        "lookup" => Ok(UpdateSelector::Lookup),
        "blocking" => Ok(UpdateSelector::Blocking),
        other => Err((
            StatusCode::BAD_REQUEST,
            format!("unknown selector '{other}'"),
        )),
    }
}

async fn block_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.block_country.execute(&code).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(error = %e, "failed to block country");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn unblock_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.unblock_country.execute(&code).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(error = %e, "failed to unblock country");
            Err((StatusCode::NOT_FOUND, e.to_string()))
        }
    }
}

async fn refresh_zones(State(state): State<AppState>) -> Json<RefreshZonesResponse> {
    let (updated, errors) = state.refresh_zones.execute().await;
    Json(RefreshZonesResponse { updated, errors })
}

async fn trigger_update(
    State(state): State<AppState>,
    Query(query): Query<UpdateSelectorQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    let selector = parse_selector(&query.selector)?;
    match state.trigger_update.execute(selector).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(error = %e, "manual update trigger failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
