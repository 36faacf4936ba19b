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
async fn health_check_returns_ok() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn apply_now_invokes_the_reconciler() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reconciler/apply")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        h.reconciler
            .apply_all_calls
            .load(std::sync::atomic::Ordering::Relaxed),
        1
    );
}

#[tokio::test]
async fn get_sync_status_reports_the_reconciler_snapshot() {
    let h = harness();
    let app = create_api_routes(h.state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reconciler/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["in_sync"], true);
    assert_eq!(body["pending"], false);
}
