use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assembles the admin API: a flat health route plus each handler module's
/// own nested `Router<AppState>`.
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(handlers::entries::routes())
        .merge(handlers::jails::routes())
        .merge(handlers::geo::routes())
        .merge(handlers::reconciler::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
