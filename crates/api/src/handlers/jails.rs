use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use meshsentry_domain::{Action, EscalationConfig, Jail, Protocol};
use tracing::error;

use crate::{
    dto::{JailRequest, JailResponse},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jails", get(list_jails).post(create_jail))
        .route(
            "/jails/{name}",
            axum::routing::put(update_jail).delete(delete_jail),
        )
}

fn parse_jail(req: JailRequest, id: Option<i64>) -> Result<Jail, (StatusCode, String)> {
    let protocol = Protocol::from_str(&req.protocol)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown protocol '{}'", req.protocol)))?;
    let action = Action::from_str(&req.action)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown action '{}'", req.action)))?;

    Ok(Jail {
        id,
        name: req.name.into(),
        enabled: req.enabled,
        log_file: req.log_file.into(),
        filter_regex: req.filter_regex.into(),
        max_retry: req.max_retry,
        find_time_secs: req.find_time_secs,
        ban_time_secs: req.ban_time_secs,
        port: req.port,
        protocol,
        action,
        last_log_pos: 0,
        escalation: EscalationConfig {
            enabled: req.escalation_enabled,
            threshold: req.escalation_threshold,
            window_secs: req.escalation_window_secs,
        },
    })
}

async fn list_jails(
    State(state): State<AppState>,
) -> Result<Json<Vec<JailResponse>>, (StatusCode, String)> {
    match state.list_jails.execute().await {
        Ok(jails) => Ok(Json(jails.into_iter().map(JailResponse::from).collect())),
        Err(e) => {
            error!(error = %e, "failed to list jails");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn create_jail(
    State(state): State<AppState>,
    Json(req): Json<JailRequest>,
) -> Result<(StatusCode, Json<JailResponse>), (StatusCode, String)> {
    let jail = parse_jail(req, None)?;
    match state.create_jail.execute(jail).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(JailResponse::from(created)))),
        Err(e) => {
            error!(error = %e, "failed to create jail");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn update_jail(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<JailRequest>,
) -> Result<Json<JailResponse>, (StatusCode, String)> {
    if req.name != name {
        return Err((
            StatusCode::BAD_REQUEST,
            "path name and body name must match".to_string(),
        ));
    }
    let jail = parse_jail(req, None)?;
    match state.update_jail.execute(jail).await {
        Ok(updated) => Ok(Json(JailResponse::from(updated))),
        Err(e) => {
            error!(error = %e, "failed to update jail");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn delete_jail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.delete_jail.execute(&name).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(error = %e, "failed to delete jail");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
