use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "freight-backoffice");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scan_endpoint_accepts_post_only() {
    let app = create_test_app();

    // GET sobre un endpoint POST no debe ser 500
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/alert/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_error_envelope_shape() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/alert/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "CONFLICT");
    assert!(body["message"].is_string());
}

// Función helper para crear la app de test: misma forma de router que el
// servidor real, con handlers stub (los endpoints reales necesitan PostgreSQL)
fn create_test_app() -> Router {
    Router::new()
        .route("/test", get(health_stub))
        .route("/api/alert/scan", post(scan_conflict_stub))
}

async fn health_stub() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "freight-backoffice",
    }))
}

async fn scan_conflict_stub() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": "Conflict",
            "message": "An alert scan is already running",
            "code": "CONFLICT",
        })),
    )
}
