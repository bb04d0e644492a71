//! Routing and extractor behaviour that is settled before any database access.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;

use foodgram_recipes::router::build_router;
use foodgram_recipes::state::AppState;
use foodgram_testing::auth::MockAuth;

fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        media_root: std::env::temp_dir(),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_report_live_on_healthz() {
    let response = server().get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = server().get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_attach_request_id_to_responses() {
    let response = server().get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_require_identity_to_create_recipe() {
    let response = server()
        .post("/recipes")
        .json(&serde_json::json!({ "name": "Soup Deluxe" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_malformed_identity_on_read() {
    let response = server()
        .get("/recipes")
        .add_header(
            HeaderName::from_static("x-foodgram-user-id"),
            HeaderValue::from_static("not-a-uuid"),
        )
        .add_header(
            HeaderName::from_static("x-foodgram-user-role"),
            HeaderValue::from_static("0"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_tag_creation_for_regular_user() {
    let auth = MockAuth::user();
    let mut request = server().post("/tags").json(&serde_json::json!({
        "name": "Lunch",
        "color": "#E26C2D",
        "slug": "lunch",
    }));
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }

    let response = request.await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_route_static_recipe_paths_before_id() {
    let response = server().get("/recipes/download_shopping_cart").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server().get("/users/subscriptions").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server().get("/users/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_unparsable_recipe_query() {
    let response = server().get("/recipes?author=not-a-uuid").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "MISSING_DATA");
}
