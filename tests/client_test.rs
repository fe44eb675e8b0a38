use httpmock::prelude::*;
use serde_json::json;
use truckstop_proxy::domain::model::Credentials;
use truckstop_proxy::server::LOAD_SEARCH_PATH;
use truckstop_proxy::{ProxyClient, ProxyError, SearchForm};

fn credentials() -> Credentials {
    Credentials {
        integration_id: "1001".to_string(),
        user_name: "dispatch".to_string(),
        password: "secret".to_string(),
    }
}

fn form() -> SearchForm {
    SearchForm {
        origin_city: Some("Denver".to_string()),
        origin_states: vec!["co".to_string()],
        destination_states: vec!["TX".to_string(), "OK".to_string()],
        equipment_types: vec!["V".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_search_posts_camel_case_request() {
    let server = MockServer::start_async().await;
    let proxy_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(LOAD_SEARCH_PATH)
                .json_body_partial(
                    json!({
                        "integrationId": "1001",
                        "userName": "dispatch",
                        "password": "secret",
                        "criteria": {
                            "originState": "CO",
                            "originCity": "Denver",
                            "destinationState": "TX,OK",
                            "pageSize": 50,
                            "sortBy": "Age"
                        }
                    })
                    .to_string(),
                );
            then.status(200).json_body(json!({
                "loads": [{ "id": "1", "originCity": "Denver" }, { "id": "2" }],
                "errorMessage": null,
                "hasError": false,
                "totalResults": 2
            }));
        })
        .await;

    let client = ProxyClient::new(&server.base_url()).unwrap();
    let result = client.search_loads(&credentials(), &form()).await.unwrap();

    proxy_mock.assert_async().await;
    assert_eq!(result.total_results, 2);
    let loads = result.loads.unwrap();
    assert_eq!(loads[0].origin_city.as_deref(), Some("Denver"));
    assert_eq!(loads[1].id.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_bad_request_surfaces_proxy_error_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(LOAD_SEARCH_PATH);
            then.status(400)
                .json_body(json!({ "error": "SOAP Fault [s:Client]: Invalid credentials" }));
        })
        .await;

    let client = ProxyClient::new(&server.base_url()).unwrap();
    let err = client.search_loads(&credentials(), &form()).await.unwrap_err();

    match err {
        ProxyError::ProxyStatusError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "SOAP Fault [s:Client]: Invalid credentials");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_status_without_error_body_uses_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(LOAD_SEARCH_PATH);
            then.status(502).body("<html>bad gateway</html>");
        })
        .await;

    let client = ProxyClient::new(&server.base_url()).unwrap();
    let err = client.search_loads(&credentials(), &form()).await.unwrap_err();

    match err {
        ProxyError::ProxyStatusError { status, message } => {
            assert_eq!(status, 502);
            assert!(message.starts_with("API request failed: 502"), "{}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_flag_in_ok_response_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(LOAD_SEARCH_PATH);
            then.status(200).json_body(json!({
                "loads": null,
                "errorMessage": null,
                "hasError": true,
                "totalResults": 0
            }));
        })
        .await;

    let client = ProxyClient::new(&server.base_url()).unwrap();
    let err = client.search_loads(&credentials(), &form()).await.unwrap_err();

    assert_eq!(err.to_string(), "Unknown API error");
}
