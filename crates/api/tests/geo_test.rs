use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use meshsentry_api::create_api_routes;
use serde_json::Value;
use tower::ServiceExt;

mod helpers;
use helpers::harness;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn block_country_upserts_an_entry_and_primes_the_zone_cache() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geo/countries/RU")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(h.store.all().await.len(), 1);
    assert_eq!(h.reconciler.apply_requests(), 1);
}

#[tokio::test]
async fn block_country_rejects_a_malformed_code() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geo/countries/RUS")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unblock_country_not_found_returns_404() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/geo/countries/RU")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn block_then_unblock_country_round_trips() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geo/countries/RU")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/geo/countries/RU")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(h.store.all().await.len(), 0);
}

#[tokio::test]
async fn refresh_zones_returns_the_update_and_error_counts() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geo/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["updated"], 0);
    assert_eq!(body["errors"], 0);
}

#[tokio::test]
async fn trigger_update_rejects_an_unknown_selector() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geo/update?selector=whenever")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trigger_update_defaults_to_the_all_selector() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geo/update")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(h.scheduler.calls.load(std::sync::atomic::Ordering::Relaxed), 1);
}
