//! Integration tests for invtrack-server API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Template create/list/update/delete
//! - Stock intake and filtered, paginated inventory listing
//! - Location uniqueness rules
//! - Error responses (400, 404, 409), including malformed bodies and queries

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method
use invtrack_server::{build_router, AppState};

/// Test helper: fresh database in a temp dir; keep the TempDir alive
async fn setup_app() -> (TempDir, axum::Router) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = invtrack_common::db::init::init_database(&dir.path().join("invtrack.db"))
        .await
        .expect("Should initialize test database");
    (dir, build_router(AppState::new(pool)))
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn raw_json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Send a request and return status + parsed body (Null for empty bodies)
async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, extract_json(response.into_body()).await)
}

async fn create_template(app: &axum::Router, code: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/templates",
            json!({"asset_code": code, "name": name, "brand": "HP", "type": "Laptop"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "invtrack-server");
    assert!(body["version"].is_string());
}

// =============================================================================
// Templates
// =============================================================================

#[tokio::test]
async fn test_template_lifecycle() {
    let (_dir, app) = setup_app().await;
    let id = create_template(&app, "740895", "HP Probook Laptop").await;

    let (status, body) = send(&app, test_request("GET", &format!("/api/templates/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "HP Probook Laptop");
    assert_eq!(body["type"], "Laptop");

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/templates/{}", id), json!({"color": "Black"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "Black");
    assert_eq!(body["brand"], "HP");

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/templates/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, test_request("GET", &format!("/api/templates/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_template_requires_asset_code() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/templates", json!({"name": "Chair"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_templates_listed_by_name() {
    let (_dir, app) = setup_app().await;
    create_template(&app, "2", "Projector").await;
    create_template(&app, "1", "Desk").await;

    let (status, body) = send(&app, test_request("GET", "/api/templates")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Desk", "Projector"]);
}

// =============================================================================
// Items
// =============================================================================

#[tokio::test]
async fn test_add_stock_and_filter() {
    let (_dir, app) = setup_app().await;
    let laptop = create_template(&app, "740895", "HP Probook Laptop").await;
    let chair = create_template(&app, "112233", "Chair").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({
                "template_id": laptop,
                "location": "Lab 1",
                "quantities": {"BUENO": 2, "MALO": 1},
                "observations": "audit 2024"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let positions: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": chair, "location": "Office", "quantities": {"REGULAR": 1}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, test_request("GET", "/api/items?search=probook")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 50);
    assert_eq!(body["items"][0]["template"]["name"], "HP Probook Laptop");
    assert_eq!(body["items"][0]["observations"], "audit 2024");

    let (_, body) = send(
        &app,
        test_request("GET", "/api/items?location=Lab%201&conservation_state=MALO"),
    )
    .await;
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["items"][0]["position"], 3);

    let (_, body) = send(&app, test_request("GET", "/api/conservation-states")).await;
    assert_eq!(body, json!(["BUENO", "MALO", "REGULAR"]));
}

#[tokio::test]
async fn test_add_stock_validation() {
    let (_dir, app) = setup_app().await;
    let laptop = create_template(&app, "740895", "HP Probook Laptop").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": laptop, "location": "Lab", "quantities": {}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": "tpl-missing", "location": "Lab", "quantities": {"BUENO": 1}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, test_request("GET", "/api/items")).await;
    assert_eq!(body["total_results"], 0);
}

#[tokio::test]
async fn test_add_stock_rejects_oversized_quantity() {
    let (_dir, app) = setup_app().await;
    let laptop = create_template(&app, "740895", "HP Probook Laptop").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": laptop, "location": "Lab", "quantities": {"BUENO": 4294967295u32}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (_, body) = send(&app, test_request("GET", "/api/items")).await;
    assert_eq!(body["total_results"], 0);
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(
        &app,
        raw_json_request("POST", "/api/templates", "{\"asset_code\": \"1\","),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].is_string());

    // Valid JSON, wrong shape
    let (status, body) = send(
        &app,
        json_request("POST", "/api/items/stock", json!({"template_id": "tpl-1", "location": "Lab"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/locations", json!({"name": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, body) = send(&app, test_request("GET", "/api/items?page=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_items_page_size_requested_and_capped() {
    let (_dir, app) = setup_app().await;
    let chair = create_template(&app, "112233", "Chair").await;
    send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": chair, "location": "Office", "quantities": {"BUENO": 5}}),
        ),
    )
    .await;

    let (status, body) = send(&app, test_request("GET", "/api/items?page=2&page_size=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total_pages"], 3);
    let positions: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![3, 4]);

    let (_, body) = send(&app, test_request("GET", "/api/items?page_size=100000")).await;
    assert_eq!(body["page_size"], 500);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_search_is_case_insensitive_beyond_ascii() {
    let (_dir, app) = setup_app().await;
    let projector = create_template(&app, "555", "CAÑÓN PROYECTOR").await;
    send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": projector, "location": "Aula", "quantities": {"BUENO": 1}}),
        ),
    )
    .await;

    for query in ["search=ca%C3%B1%C3%B3n", "search=CA%C3%91%C3%93N", "search=proyector"] {
        let (status, body) = send(&app, test_request("GET", &format!("/api/items?{}", query))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_results"], 1, "query {}", query);
    }
}

#[tokio::test]
async fn test_update_item_serial_and_delete() {
    let (_dir, app) = setup_app().await;
    let laptop = create_template(&app, "740895", "HP Probook Laptop").await;
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/items/stock",
            json!({"template_id": laptop, "location": "Lab", "quantities": {"BUENO": 1}}),
        ),
    )
    .await;
    let id = body[0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/items/{}", id), json!({"serial": "5CD1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serial"], "5CD1234");

    // Template in use cannot be deleted
    let (status, body) = send(&app, test_request("DELETE", &format!("/api/templates/{}", laptop))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/items/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, test_request("GET", &format!("/api/items/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Locations
// =============================================================================

#[tokio::test]
async fn test_location_uniqueness() {
    let (_dir, app) = setup_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/locations", json!({"name": " Warehouse "})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Warehouse");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        json_request("POST", "/api/locations", json!({"name": "WAREHOUSE"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/locations", json!({"name": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/locations/{}", id), json!({"name": "Storeroom"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Storeroom");

    let (status, body) = send(&app, test_request("GET", &format!("/api/locations/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Storeroom");

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/locations/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, test_request("GET", "/api/locations")).await;
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, test_request("GET", &format!("/api/locations/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}
