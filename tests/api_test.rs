use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use electrical_profiles::adapters::http::router;
use electrical_profiles::{MemoryStorage, ProfileStore, QueryService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup() -> (Router, Arc<ProfileStore<MemoryStorage>>) {
    let store = Arc::new(
        ProfileStore::open(MemoryStorage::new(), "profiles.json")
            .await
            .unwrap(),
    );
    let app = router(QueryService::new(Arc::clone(&store)));
    (app, store)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri).await
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content type {:?} for {}",
        content_type,
        uri
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_retrieve_and_level_order() {
    let (app, store) = setup().await;
    let data = json!([{"value": "A", "power_class": "1500V", "track_ranges": []}]);
    let id = store.create("2023 profiles", &data, None).await.unwrap();

    let (status, body) = get(&app, &format!("/electrical_profile_set/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, data);

    let (status, body) = get(&app, &format!("/electrical_profile_set/{}/level_order/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_list_only_exposes_id_and_name() {
    let (app, store) = setup().await;
    let data = json!([{"value": "25000", "power_class": "1", "track_ranges": [
        {"track": "TA0", "begin": 0.0, "end": 10.0}
    ]}]);
    let first = store
        .create("first", &data, Some(&json!({"1": ["25000"]})))
        .await
        .unwrap();
    let second = store.create("second", &json!([]), None).await.unwrap();

    let (status, body) = get(&app, "/electrical_profile_set/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": first, "name": "first"},
            {"id": second, "name": "second"}
        ])
    );
}

#[tokio::test]
async fn test_empty_list() {
    let (app, _store) = setup().await;

    let (status, body) = get(&app, "/electrical_profile_set/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let (app, _store) = setup().await;

    for uri in [
        "/electrical_profile_set/12/",
        "/electrical_profile_set/12/level_order/",
        "/electrical_profile_set/abc/",
        "/electrical_profile_set/abc/level_order/",
        "/unknown/",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, json!({"error": "Not found."}));
    }
}

#[tokio::test]
async fn test_reads_follow_updates() {
    let (app, store) = setup().await;
    let id = store.create("set", &json!([]), None).await.unwrap();
    store
        .update_level_order(id, &json!({"1": ["A", "B"]}))
        .await
        .unwrap();

    let (_, body) = get(&app, &format!("/electrical_profile_set/{}/level_order/", id)).await;
    assert_eq!(body, json!({"1": ["A", "B"]}));
}

#[tokio::test]
async fn test_wrong_method_answers_json() {
    let (app, store) = setup().await;
    let id = store.create("set", &json!([]), None).await.unwrap();

    for (method, uri) in [
        (Method::POST, "/electrical_profile_set/".to_string()),
        (Method::DELETE, format!("/electrical_profile_set/{}/", id)),
        (Method::PUT, format!("/electrical_profile_set/{}/level_order/", id)),
    ] {
        let (status, body) = send(&app, method, &uri).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
        assert_eq!(body, json!({"error": "Method not allowed."}));
    }

    // 資料未被更動
    assert!(store.get(id).await.is_ok());
}
