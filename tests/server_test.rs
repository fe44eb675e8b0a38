use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use truckstop_proxy::config::toml_config::ServerConfig;
use truckstop_proxy::domain::model::{LoadDetail, LoadSearchApiRequest, MultipleLoadDetailReturn};
use truckstop_proxy::domain::ports::LoadSearch;
use truckstop_proxy::server::LOAD_SEARCH_PATH;
use truckstop_proxy::{create_router, AppState};

/// Answers with a fixed result and remembers what it was asked.
#[derive(Clone)]
struct StubSearch {
    result: MultipleLoadDetailReturn,
    seen: Arc<Mutex<Vec<LoadSearchApiRequest>>>,
}

impl StubSearch {
    fn new(result: MultipleLoadDetailReturn) -> Self {
        Self {
            result,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LoadSearch for StubSearch {
    async fn get_multiple_load_detail_results(
        &self,
        request: LoadSearchApiRequest,
    ) -> MultipleLoadDetailReturn {
        self.seen.lock().unwrap().push(request);
        self.result.clone()
    }
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(LOAD_SEARCH_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn search_body() -> String {
    json!({
        "integrationId": "1001",
        "userName": "dispatch",
        "password": "secret",
        "criteria": { "originState": "TX", "equipmentType": "V" }
    })
    .to_string()
}

#[tokio::test]
async fn test_successful_search_returns_ok() {
    let stub = StubSearch::new(MultipleLoadDetailReturn::success(vec![LoadDetail {
        id: Some("77".to_string()),
        bond_type_id: Some("2".to_string()),
        ..Default::default()
    }]));
    let seen = stub.seen.clone();
    let app = create_router(AppState::new(stub), &ServerConfig::default());

    let response = app.oneshot(post_json(&search_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["hasError"], false);
    assert_eq!(body["totalResults"], 1);
    assert_eq!(body["loads"][0]["id"], "77");
    assert_eq!(body["loads"][0]["bondTypeID"], "2");
    assert_eq!(body["loads"][0]["weight"], Value::Null);

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let criteria = requests[0].criteria.as_ref().unwrap();
    assert_eq!(criteria.equipment_type, Some(vec!["V".to_string()]));
}

#[tokio::test]
async fn test_failed_search_returns_bad_request_with_error() {
    let stub = StubSearch::new(MultipleLoadDetailReturn::error(
        "SOAP Fault [s:Client]: Invalid credentials",
    ));
    let app = create_router(AppState::new(stub), &ServerConfig::default());

    let response = app.oneshot(post_json(&search_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "SOAP Fault [s:Client]: Invalid credentials" }));
}

#[tokio::test]
async fn test_malformed_json_is_rejected_without_calling_upstream() {
    let stub = StubSearch::new(MultipleLoadDetailReturn::success(vec![]));
    let seen = stub.seen.clone();
    let app = create_router(AppState::new(stub), &ServerConfig::default());

    let response = app.oneshot(post_json("{ not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].is_string());
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_pascal_case_request_is_accepted() {
    let stub = StubSearch::new(MultipleLoadDetailReturn::success(vec![]));
    let seen = stub.seen.clone();
    let app = create_router(AppState::new(stub), &ServerConfig::default());

    let body = json!({
        "IntegrationId": "1001",
        "UserName": "dispatch",
        "Password": "secret",
        "Criteria": { "OriginState": "CO" }
    })
    .to_string();
    let response = app.oneshot(post_json(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].user_name, "dispatch");
    assert_eq!(requests[0].criteria.as_ref().unwrap().origin_state, "CO");
}

#[tokio::test]
async fn test_openapi_document_is_served_when_enabled() {
    let stub = StubSearch::new(MultipleLoadDetailReturn::success(vec![]));
    let app = create_router(AppState::new(stub.clone()), &ServerConfig::default());

    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["paths"][LOAD_SEARCH_PATH]["post"]["operationId"],
        "GetMultipleLoadDetailResults"
    );

    let disabled = ServerConfig {
        openapi: false,
        ..Default::default()
    };
    let app = create_router(AppState::new(stub), &disabled);
    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let stub = StubSearch::new(MultipleLoadDetailReturn::success(vec![]));
    let app = create_router(AppState::new(stub), &ServerConfig::default());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(LOAD_SEARCH_PATH)
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
