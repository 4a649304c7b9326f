use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{Method::GET, Method::POST, Mock, MockServer};
use searchbridge::{api, config::EnvLookup, pipeline::BridgeService};
use serde_json::{Value, json};
use tower::ServiceExt;

fn env_for(
    contentful: &MockServer,
    algolia: &MockServer,
    extra: &[(&str, &str)],
) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = [
        ("CONTENTFUL_API_URL", contentful.base_url()),
        ("CONTENTFUL_SPACE_ID", "space-1".to_string()),
        ("CONTENTFUL_ACCESS_TOKEN", "delivery-token".to_string()),
        ("ALGOLIA_API_URL", algolia.base_url()),
        ("ALGOLIA_APP_ID", "APP".to_string()),
        ("ALGOLIA_ADMIN_KEY", "admin-key".to_string()),
        ("ALGOLIA_INDEX", "env_index".to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();
    for (key, value) in extra {
        env.insert(key.to_string(), value.to_string());
    }
    env
}

async fn mock_entries(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/spaces/space-1/environments/master/entries")
                .query_param("access_token", "delivery-token")
                .query_param("content_type", "blogPost")
                .header("x-edge-origin", "contentful");
            then.status(200).json_body(json!({
                "total": 2,
                "skip": 0,
                "limit": 100,
                "items": [
                    {
                        "sys": { "type": "Entry", "id": "post-a" },
                        "fields": {
                            "isSearchable": true,
                            "slug": "a",
                            "author": { "sys": { "type": "Link", "linkType": "Entry", "id": "author-1" } }
                        }
                    },
                    {
                        "sys": { "type": "Entry", "id": "post-b" },
                        "fields": { "isSearchable": false, "slug": "b" }
                    }
                ],
                "includes": {
                    "Entry": [{ "sys": { "type": "Entry", "id": "author-1" }, "fields": { "name": "Ada" } }]
                }
            }));
        })
        .await
}

async fn invoke(env: HashMap<String, String>, uri: &str) -> (StatusCode, Value) {
    let env: Arc<dyn EnvLookup> = Arc::new(env);
    let service = BridgeService::new(env).expect("service");
    let response = api::create_router(Arc::new(service))
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn default_invocation_returns_resolved_entries_without_indexing() {
    let contentful = MockServer::start_async().await;
    let algolia = MockServer::start_async().await;
    let entries = mock_entries(&contentful).await;
    let batch = algolia
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "taskID": 1 }));
        })
        .await;

    let (status, body) = invoke(env_for(&contentful, &algolia, &[]), "/").await;

    entries.assert_async().await;
    assert_eq!(batch.hits_async().await, 0);
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("entry array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["fields"]["author"]["fields"]["name"], json!("Ada"));
    assert_eq!(items[1]["fields"]["slug"], json!("b"));
}

#[tokio::test]
async fn enabled_indexing_submits_searchable_entries_to_query_index() {
    let contentful = MockServer::start_async().await;
    let algolia = MockServer::start_async().await;
    mock_entries(&contentful).await;
    let batch = algolia
        .mock_async(|when, then| {
            when.method(POST)
                .path("/1/indexes/override_index/batch")
                .header("x-algolia-api-key", "admin-key")
                .header("x-algolia-application-id", "APP")
                .json_body(json!({
                    "requests": [{
                        "action": "addObject",
                        "body": {
                            "isSearchable": true,
                            "slug": "a",
                            "author": { "sys": { "type": "Entry", "id": "author-1" }, "fields": { "name": "Ada" } },
                            "objectID": "a"
                        }
                    }]
                }));
            then.status(200)
                .json_body(json!({ "taskID": 99, "objectIDs": ["a"] }));
        })
        .await;

    let env = env_for(
        &contentful,
        &algolia,
        &[
            ("INDEXING_ENABLED", "true"),
            ("RESPONSE_BODY", "acknowledgements"),
        ],
    );
    let (status, body) = invoke(env, "/?index_name=override_index").await;

    batch.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "taskID": 99, "objectIDs": ["a"] }]));
}

#[tokio::test]
async fn requests_mode_returns_built_requests() {
    let contentful = MockServer::start_async().await;
    let algolia = MockServer::start_async().await;
    mock_entries(&contentful).await;

    let env = env_for(&contentful, &algolia, &[("RESPONSE_BODY", "requests")]);
    let (_, body) = invoke(env, "/").await;

    let requests = body.as_array().expect("request array");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["action"], json!("addObject"));
    assert_eq!(requests[0]["body"]["objectID"], json!("a"));
}

#[tokio::test]
async fn content_api_failure_is_returned_as_string_body() {
    let algolia = MockServer::start_async().await;
    let mut env = env_for(&algolia, &algolia, &[]);
    // Nothing listens on port 9 on the test host.
    env.insert("CONTENTFUL_API_URL".into(), "http://127.0.0.1:9".into());

    let (status, body) = invoke(env, "/").await;

    assert_eq!(status, StatusCode::OK);
    let message = body.as_str().expect("error string body");
    assert!(message.starts_with("Contentful request failed: HTTP request failed"));
}

#[tokio::test]
async fn missing_algolia_credentials_fail_only_when_indexing() {
    let contentful = MockServer::start_async().await;
    let algolia = MockServer::start_async().await;
    mock_entries(&contentful).await;

    let mut env = env_for(&contentful, &algolia, &[("INDEXING_ENABLED", "true")]);
    env.remove("ALGOLIA_ADMIN_KEY");
    let (status, body) = invoke(env, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!("Algolia request failed: Missing Algolia credential: ALGOLIA_ADMIN_KEY")
    );
}
