use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use meshsentry_domain::{Action, Direction, EntryType, FirewallEntry, Protocol};
use tracing::error;

use crate::{
    dto::{
        BulkImportResultResponse, DeleteEntryQuery, EntryResponse, ListEntriesQuery,
        UpsertEntryRequest,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(upsert_entry))
        .route("/entries/bulk", post(bulk_import))
        .route("/entries/{id}", axum::routing::delete(delete_entry))
        .route("/entries/by-source/{prefix}", axum::routing::delete(delete_by_source))
}

fn parse_entry(req: UpsertEntryRequest) -> Result<FirewallEntry, (StatusCode, String)> {
    let entry_type = EntryType::from_str(&req.entry_type)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown entry_type '{}'", req.entry_type)))?;
    let protocol = Protocol::from_str(&req.protocol)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown protocol '{}'", req.protocol)))?;
    let action = Action::from_str(&req.action)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown action '{}'", req.action)))?;
    let direction = Direction::from_str(&req.direction)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown direction '{}'", req.direction)))?;

    let mut entry = FirewallEntry::new(
        entry_type,
        req.value,
        protocol,
        action,
        direction,
        req.source,
        req.reason,
        req.name,
        req.essential,
        req.expires_at,
    );
    entry.id = req.id;
    Ok(entry)
}

async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<Vec<EntryResponse>>, (StatusCode, String)> {
    let entry_type = match query.entry_type {
        Some(s) => Some(
            EntryType::from_str(&s)
                .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown entry type '{s}'")))?,
        ),
        None => None,
    };

    match state.list_entries.execute(entry_type).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(EntryResponse::from).collect())),
        Err(e) => {
            error!(error = %e, "failed to list entries");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn upsert_entry(
    State(state): State<AppState>,
    Json(req): Json<UpsertEntryRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, String)> {
    let entry = parse_entry(req)?;
    match state.upsert_entry.execute(entry).await {
        Ok(is_new) => {
            let status = if is_new { StatusCode::CREATED } else { StatusCode::OK };
            Ok((status, Json(serde_json::json!({ "is_new": is_new }))))
        }
        Err(e) => {
            error!(error = %e, "failed to upsert entry");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteEntryQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.delete_entry.execute(id, query.essential_override).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(error = %e, "failed to delete entry");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn delete_by_source(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match state.delete_by_source.execute(&prefix).await {
        Ok(deleted) => Ok(Json(serde_json::json!({ "deleted": deleted }))),
        Err(e) => {
            error!(error = %e, "failed to delete entries by source");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn bulk_import(
    State(state): State<AppState>,
    Json(requests): Json<Vec<UpsertEntryRequest>>,
) -> Json<Vec<BulkImportResultResponse>> {
    let mut entries = Vec::with_capacity(requests.len());
    let mut parse_errors = Vec::new();
    for req in requests {
        let value = req.value.clone();
        match parse_entry(req) {
            Ok(entry) => entries.push(entry),
            Err((_, msg)) => parse_errors.push(BulkImportResultResponse {
                value,
                status: "error".to_string(),
                error: Some(msg),
            }),
        }
    }

    let mut results: Vec<BulkImportResultResponse> = state
        .bulk_import
        .execute(entries)
        .await
        .into_iter()
        .map(|r| {
            use meshsentry_application::use_cases::ImportOutcome;
            match r.outcome {
                ImportOutcome::Inserted => BulkImportResultResponse {
                    value: r.value,
                    status: "inserted".to_string(),
                    error: None,
                },
                ImportOutcome::Updated => BulkImportResultResponse {
                    value: r.value,
                    status: "updated".to_string(),
                    error: None,
                },
                ImportOutcome::Error(msg) => BulkImportResultResponse {
                    value: r.value,
                    status: "error".to_string(),
                    error: Some(msg),
                },
            }
        })
        .collect();

    results.extend(parse_errors);
    Json(results)
}
