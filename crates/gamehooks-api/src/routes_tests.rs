use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use gamehooks_config::DispatchConfig;
use gamehooks_registry::{EndpointStore, HttpDispatcher, StaticEventCatalog, WebhookRegistry};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn create_test_router(prefix: &str) -> (TempDir, Router) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(
        EndpointStore::open(temp_dir.path().join("webhooks.json"))
            .await
            .unwrap(),
    );
    let catalog = Arc::new(StaticEventCatalog::new([
        "player.join",
        "player.leave",
        "entity.killed",
    ]));
    let config = DispatchConfig {
        timeout_seconds: 1,
        ..Default::default()
    };
    let dispatcher = Arc::new(HttpDispatcher::new(&config).unwrap());
    let registry = Arc::new(WebhookRegistry::new(store, catalog, dispatcher));
    let router = create_router(Arc::new(AppState::new(registry)), prefix);
    (temp_dir, router)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register_endpoint(app: &Router, events: Value) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/hooks",
        Some(json!({
            "description": "Player feed",
            "url": "http://127.0.0.1:1/hook",
            "enabledEvents": events
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_liveness_probe() {
    let response = liveness_probe().await;
    assert_eq!(response.0["status"], "alive");

    let (_dir, app) = create_test_router("/hooks").await;
    let (status, body) = send(&app, "GET", "/livez", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_list_empty() {
    let (_dir, app) = create_test_router("/hooks").await;
    let (status, body) = send(&app, "GET", "/hooks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"endpoints": []}));
}

#[tokio::test]
async fn test_create_endpoint() {
    let (_dir, app) = create_test_router("/hooks").await;
    let body = register_endpoint(&app, json!(["player\\..*"])).await;

    assert_eq!(body["description"], "Player feed");
    assert_eq!(body["status"], "Enabled");
    assert_eq!(body["enabledEvents"], json!(["player\\..*"]));
    assert!(body["secret"].as_str().unwrap().starts_with("vrsec_"));
    assert!(body["created"].is_i64());

    let (_, listed) = send(&app, "GET", "/hooks", None).await;
    assert_eq!(listed["endpoints"].as_array().unwrap().len(), 1);
    assert_eq!(listed["endpoints"][0]["id"], body["id"]);
}

#[tokio::test]
async fn test_create_validation_error() {
    let (_dir, app) = create_test_router("/hooks").await;
    let (status, body) = send(
        &app,
        "POST",
        "/hooks",
        Some(json!({"url": "http://127.0.0.1:1/hook", "enabledEvents": ["nope"]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let (_, listed) = send(&app, "GET", "/hooks", None).await;
    assert!(listed["endpoints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_malformed_body() {
    let (_dir, app) = create_test_router("/hooks").await;
    let (status, body) = send(&app, "POST", "/hooks", Some(json!({"description": "no url"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_endpoint() {
    let (_dir, app) = create_test_router("/hooks").await;
    let created = register_endpoint(&app, json!(["player.join"])).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/hooks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_unknown_endpoint() {
    let (_dir, app) = create_test_router("/hooks").await;
    let id = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/hooks/{}", id), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        format!("The endpoint with id {} does not exist", id)
    );
}

#[tokio::test]
async fn test_malformed_id() {
    let (_dir, app) = create_test_router("/hooks").await;

    let (status, body) = send(&app, "GET", "/hooks/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not-a-uuid"));

    let (status, _) = send(&app, "DELETE", "/hooks/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_endpoint() {
    let (_dir, app) = create_test_router("/hooks").await;
    let created = register_endpoint(&app, json!(["player.join"])).await;
    let uri = format!("/hooks/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "POST", &uri, Some(json!({"disable": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Disabled");
    assert_eq!(body["enabledEvents"], created["enabledEvents"]);
    assert_eq!(body["secret"], created["secret"]);

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({"enabledEvents": ["castle.sieged"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("castle.sieged"));

    let (_, current) = send(&app, "GET", &uri, None).await;
    assert_eq!(current["enabledEvents"], json!(["player.join"]));
}

#[tokio::test]
async fn test_update_unknown_endpoint() {
    let (_dir, app) = create_test_router("/hooks").await;
    let uri = format!("/hooks/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "POST", &uri, Some(json!({"disable": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint() {
    let (_dir, app) = create_test_router("/hooks").await;
    let created = register_endpoint(&app, json!(["player.join"])).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/hooks/{}", id);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "deleted": true}));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], false);
}

#[tokio::test]
async fn test_available_events() {
    let (_dir, app) = create_test_router("/hooks").await;
    let (status, body) = send(&app, "GET", "/hooks/available-events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"availableEvents": ["player.join", "player.leave", "entity.killed"]})
    );
}

#[tokio::test]
async fn test_fire_event() {
    let (_dir, app) = create_test_router("/hooks").await;
    register_endpoint(&app, json!(["player\\..*"])).await;
    register_endpoint(&app, json!(["entity\\.killed"])).await;

    let (status, body) = send(
        &app,
        "POST",
        "/events/player.join",
        Some(json!({"player": "Alucard"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        body,
        json!({"accepted": true, "eventName": "player.join", "dispatched": 1})
    );
}

#[tokio::test]
async fn test_fire_event_empty_body() {
    let (_dir, app) = create_test_router("/hooks").await;
    let (status, body) = send(&app, "POST", "/events/player.leave", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["dispatched"], 0);
}

#[tokio::test]
async fn test_fire_event_invalid_json() {
    let (_dir, app) = create_test_router("/hooks").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events/player.join")
                .header("content-type", "application/json")
                .body(Body::from("{ broken"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disabled_endpoint_not_dispatched() {
    let (_dir, app) = create_test_router("/hooks").await;
    let created = register_endpoint(&app, json!(["player\\..*"])).await;
    let uri = format!("/hooks/{}", created["id"].as_str().unwrap());
    send(&app, "POST", &uri, Some(json!({"disable": true}))).await;

    let (_, body) = send(&app, "POST", "/events/player.join", Some(json!({}))).await;
    assert_eq!(body["dispatched"], 0);
}

#[tokio::test]
async fn test_custom_prefix() {
    let (_dir, app) = create_test_router("/api/webhooks").await;
    let (status, _) = send(&app, "GET", "/api/webhooks", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/webhooks/available-events", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/hooks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_root_prefix() {
    let (_dir, app) = create_test_router("/").await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"endpoints": []}));

    let (status, _) = send(&app, "GET", "/livez", None).await;
    assert_eq!(status, StatusCode::OK);
}
