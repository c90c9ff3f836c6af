//! HTTP API contract tests.
//!
//! Drives the router directly (no network) against the in-memory
//! backend and asserts the wire contracts: status codes, error codes,
//! and response shapes of the availability, reservation, and phone
//! endpoints.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Integration tests

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use cabanamar_booking::backend::{InMemoryBackend, demo_catalog};
use cabanamar_booking::session::{MemorySessionStore, Profile};
use cabanamar_booking::types::CustomerId;
use cabanamar_booking::{AppState, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN: &str = "test-session";

struct TestApp {
    router: Router,
    backend: Arc<InMemoryBackend>,
    customer_id: CustomerId,
}

async fn test_app_with(backend: InMemoryBackend) -> TestApp {
    let backend = Arc::new(backend);
    let sessions = MemorySessionStore::new();
    let customer_id = CustomerId::new();
    sessions
        .insert(
            TOKEN,
            Profile {
                customer_id,
                display_name: "Ana".to_string(),
                email: Some("ana@example.com".to_string()),
                phone: None,
            },
        )
        .await;

    TestApp {
        router: build_router(AppState::new(backend.clone(), Arc::new(sessions))),
        backend,
        customer_id,
    }
}

async fn test_app() -> TestApp {
    test_app_with(InMemoryBackend::new(demo_catalog(), 1)).await
}

async fn post_json(
    router: &Router,
    path: &str,
    auth: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = auth {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = request
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn availability_body(package: &str, date: &str, slot: &str, adults: u32) -> Value {
    json!({
        "packageId": package,
        "date": date,
        "timeSlot": slot,
        "adults": adults,
        "kids": 0,
    })
}

fn reservation_body(package: &str, date: &str, slot: &str, adults: u32) -> Value {
    json!({
        "packageId": package,
        "date": date,
        "timeSlot": slot,
        "adults": adults,
        "kids": 0,
        "extras": [],
        "paymentMethod": "CASH",
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Availability
// ============================================================================

#[tokio::test]
async fn availability_happy_path_returns_a_cabin() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("4H", "2025-06-10", "08:00-12:00", 4),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], json!(true));
    assert!(body["cabinId"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn availability_rejects_missing_fields() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &json!({ "packageId": "4H", "adults": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing_fields"));

    // Blank strings count as missing too.
    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("", "2025-06-10", "08:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing_fields"));
}

#[tokio::test]
async fn availability_rejects_malformed_json() {
    let app = test_app().await;
    let request = Request::post("/api/availability")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("invalid_payload"));
}

#[tokio::test]
async fn availability_rejects_zero_headcount() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("4H", "2025-06-10", "08:00", 0),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("CM_INVALID_PEOPLE_COUNT"));
}

#[tokio::test]
async fn availability_rejects_unknown_package() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("GHOST", "2025-06-10", "08:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("CM_INVALID_PACKAGE"));
}

#[tokio::test]
async fn availability_domain_rejection_is_http_200() {
    let app = test_app().await;
    // Occupy the only cabin.
    let (status, _) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &reservation_body("4H", "2025-06-10", "08:00-12:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("4H", "2025-06-10", "09:00-11:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "domain-level no is not an HTTP error");
    assert_eq!(body["available"], json!(false));
    assert_eq!(body["error"], json!("CM_NO_CABIN_AVAILABLE"));
}

#[tokio::test]
async fn availability_capacity_rejection_is_http_200() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("4H", "2025-06-10", "08:00-12:00", 17),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], json!(false));
    assert_eq!(body["error"], json!("CM_MAX_PEOPLE_EXCEEDED"));
}

#[tokio::test]
async fn explicit_range_overrides_package_duration() {
    // Package 4H nominally lasts 4 hours; an explicit 14:00-22:00
    // range must be honored end-to-end regardless.
    let app = test_app().await;
    let (status, _) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &reservation_body("4H", "2025-06-10", "14:00-22:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 19:00-21:00 only collides if the explicit end (22:00) was used;
    // the nominal duration would have freed the cabin at 18:00.
    let (_, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("4H", "2025-06-10", "19:00-21:00", 4),
    )
    .await;
    assert_eq!(body["available"], json!(false));

    // Back-to-back after the explicit end is free (half-open windows).
    let (_, body) = post_json(
        &app.router,
        "/api/availability",
        None,
        &availability_body("4H", "2025-06-10", "22:00-23:00", 4),
    )
    .await;
    assert_eq!(body["available"], json!(true));
}

// ============================================================================
// Reservations
// ============================================================================

#[tokio::test]
async fn reservations_require_a_session() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/reservations",
        None,
        &reservation_body("4H", "2025-06-10", "08:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("not_authenticated"));

    let (status, body) = post_json(
        &app.router,
        "/api/reservations",
        Some("wrong-token"),
        &reservation_body("4H", "2025-06-10", "08:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("not_authenticated"));
}

#[tokio::test]
async fn reservation_happy_path_returns_id_cabin_and_total() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &reservation_body("4H", "2025-06-10", "08:00-12:00", 2),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].is_string());
    assert!(body["cabinId"].is_string());
    // 2 adults on a Tuesday price at the 4-person floor: 4 × $12.
    assert_eq!(body["total"], json!(48.0));
    assert_eq!(app.backend.booking_count().await, 1);
}

#[tokio::test]
async fn reservation_rejects_missing_fields_and_unknown_package() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &json!({ "packageId": "4H" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing_fields"));

    let (status, body) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &reservation_body("GHOST", "2025-06-10", "08:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_package"));
}

#[tokio::test]
async fn reservation_domain_rejection_surfaces_the_procedure_message() {
    let app = test_app().await;
    let (status, _) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &reservation_body("4H", "2025-06-10", "08:00-12:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app.router,
        "/api/reservations",
        Some(TOKEN),
        &reservation_body("4H", "2025-06-10", "08:00-12:00", 4),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("no_cabin_available"));
}

// ============================================================================
// Profile phone
// ============================================================================

#[tokio::test]
async fn phone_endpoint_requires_auth_and_a_number() {
    let app = test_app().await;
    let (status, _) = post_json(
        &app.router,
        "/api/profile/phone",
        None,
        &json!({ "phone": "+507 6000-0000" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_json(
        &app.router,
        "/api/profile/phone",
        Some(TOKEN),
        &json!({ "phone": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing_phone"));
}

#[tokio::test]
async fn phone_endpoint_stores_the_number() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/profile/phone",
        Some(TOKEN),
        &json!({ "phone": "+507 6000-0000" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(
        app.backend.phone_for(app.customer_id).await,
        Some("+507 6000-0000".to_string())
    );
}
