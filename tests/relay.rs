//! End-to-end tests of the relay routes against an in-process backend.

use axum::http::{HeaderValue, StatusCode};
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_canvas_bytes_pass_through_unaltered() {
    let mut grid = b"\x89PNG\r\n\x1a\n".to_vec();
    grid.extend(0u8..=255);
    grid.extend_from_slice(&[0, 0, 0xff, 0x00, b'\n', b'\r']);

    let backend = common::start_mock_backend(grid.clone()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client()
        .get(relay.url("/grid"))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"].to_str().unwrap(),
        "application/octet-stream"
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), grid.as_slice());

    let recorded = backend.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/api/grid");
}

#[tokio::test]
async fn test_canvas_alias_serves_grid() {
    let backend = common::start_mock_backend(vec![4, 2]).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client().get(relay.url("/canvas")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().as_ref(), &[4, 2]);
    assert_eq!(backend.recorded()[0].path, "/api/grid");
}

#[tokio::test]
async fn test_empty_canvas_is_relayed() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client().get(relay.url("/grid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_draw_forwards_json_and_redirects() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client()
        .post(relay.url("/draw"))
        .form(&[("myData", r#"{"x":1,"y":2,"color":"red"}"#)])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"].to_str().unwrap(), "/dashboard/");

    let recorded = backend.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/api/draw");
    assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&recorded[0].body).unwrap();
    assert_eq!(body, json!({"x": 1, "y": 2, "color": "red"}));
}

#[tokio::test]
async fn test_draw_forwards_any_json_value() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;
    let client = common::client();

    let values = [
        json!({"x": 199, "y": 0, "color": 31}),
        json!([1, 2, 3]),
        json!("just a string"),
        json!(null),
        json!({"nested": {"unicode": "pixel ✓", "list": [true, 1.5]}}),
    ];

    for value in &values {
        let res = client
            .post(relay.url("/draw"))
            .form(&[("myData", value.to_string())])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FOUND, "value {value}");
    }

    let forwarded: Vec<Value> = backend
        .recorded()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(forwarded, values);
}

#[tokio::test]
async fn test_draw_with_invalid_json_is_client_error() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client()
        .post(relay.url("/draw"))
        .form(&[("myData", "{not json")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("not valid JSON"));
    assert!(backend.recorded().is_empty(), "Backend must not be called");
}

#[tokio::test]
async fn test_draw_without_field_is_client_error() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;
    let client = common::client();

    let res = client
        .post(relay.url("/draw"))
        .form(&[("otherField", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(relay.url("/draw"))
        .header("content-type", "application/json")
        .body(r#"{"myData": "{}"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    assert!(backend.recorded().is_empty());
}

#[tokio::test]
async fn test_request_id_reaches_backend() {
    let backend = common::start_mock_backend(vec![1, 2, 3]).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;
    let client = common::client();

    let res = client
        .get(relay.url("/grid"))
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"].to_str().unwrap(), "trace-42");

    let res = client.get(relay.url("/grid")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!generated.is_empty());
    assert_ne!(generated, "trace-42");

    let recorded = backend.recorded();
    assert_eq!(recorded[0].request_id.as_ref().unwrap(), "trace-42");
    assert_eq!(recorded[1].request_id.as_ref().unwrap(), generated.as_str());
}

#[tokio::test]
async fn test_non_ascii_request_id_is_forwarded_verbatim() {
    let backend = common::start_mock_backend(vec![1]).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;
    let raw = HeaderValue::from_bytes(b"trace-\xe9t\xe9").unwrap();

    let res = common::client()
        .post(relay.url("/draw"))
        .header("x-request-id", raw.clone())
        .form(&[("myData", r#"{"x":0,"y":0,"color":1}"#)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["x-request-id"], raw);

    assert_eq!(backend.recorded()[0].request_id.as_ref(), Some(&raw));
}

#[tokio::test]
async fn test_backend_base_url_prefix_is_kept() {
    let backend = common::start_mock_backend(vec![7]).await;
    let relay = common::start_relay(format!("{}/", backend.url()), |_| {}).await;

    let res = common::client().get(relay.url("/grid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(backend.recorded()[0].path, "/api/grid");
}

#[tokio::test]
async fn test_health_does_not_touch_backend() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client().get(relay.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(backend.recorded().is_empty());
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let backend = common::start_mock_backend(Vec::new()).await;
    let relay = common::start_relay(backend.url(), |_| {}).await;

    let res = common::client().get(relay.url("/draw")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(backend.recorded().is_empty());
}
