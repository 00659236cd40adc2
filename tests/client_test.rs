use electrical_profiles::{ProfileError, ProfileSetClient};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn profiles_body() -> serde_json::Value {
    json!([
        {"value": "25000", "power_class": "1", "track_ranges": [
            {"track": "track", "begin": 0.0, "end": 10.0},
            {"track": "track", "begin": 90.0, "end": 100.0}
        ]},
        {"value": "22500", "power_class": "1", "track_ranges": [
            {"track": "track", "begin": 10.0, "end": 30.0},
            {"track": "track", "begin": 70.0, "end": 90.0}
        ]},
        {"value": "20000", "power_class": "1", "track_ranges": [
            {"track": "track", "begin": 30.0, "end": 70.0}
        ]}
    ])
}

#[tokio::test]
async fn test_list_and_level_order() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/api/electrical_profile_set/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{"id": 1, "name": "2023 profiles"}]));
    });
    let order_mock = server.mock(|when, then| {
        when.method(GET).path("/api/electrical_profile_set/1/level_order/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"1": ["25000", "22500", "20000"]}));
    });

    let client = ProfileSetClient::new(&server.url("/api"), None).unwrap();

    let sets = client.list().await.unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].name, "2023 profiles");

    let order = client.fetch_level_order(1).await.unwrap();
    assert_eq!(order.levels("1").unwrap(), ["25000", "22500", "20000"]);

    list_mock.assert();
    order_mock.assert();
}

#[tokio::test]
async fn test_profile_mapping_is_fetched_once() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/electrical_profile_set/7/")
            .header("Authorization", "Bearer token-123");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(profiles_body());
    });

    let client = ProfileSetClient::new(&server.base_url(), Some("token-123".to_string())).unwrap();

    let mapping = client.profile_mapping(7).await.unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.value_at("1", "track", 5.0), Some("25000"));
    assert_eq!(mapping.value_at("1", "track", 20.0), Some("22500"));
    assert_eq!(mapping.value_at("1", "track", 50.0), Some("20000"));

    let again = client.profile_mapping(7).await.unwrap();
    assert!(Arc::ptr_eq(&mapping, &again));
    assert!(client.is_cached(7));

    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/electrical_profile_set/3/");
        then.status(404)
            .header("Content-Type", "application/json")
            .json_body(json!({"error": "Not found."}));
    });
    let broken = server.mock(|when, then| {
        when.method(GET).path("/electrical_profile_set/4/");
        then.status(500);
    });

    let client = ProfileSetClient::new(&server.base_url(), None).unwrap();

    let err = client.profile_mapping(3).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "ElectricalProfilesSet 3 not found");
    assert!(!client.is_cached(3));

    match client.profile_mapping(4).await {
        Err(ProfileError::UnexpectedResponse { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected result: {:?}", other.map(|m| m.len())),
    }
    assert!(!client.is_cached(4));

    missing.assert();
    broken.assert();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cached_set_is_served_while_another_downloads() {
    let server = MockServer::start();
    let cached = server.mock(|when, then| {
        when.method(GET).path("/electrical_profile_set/1/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(profiles_body());
    });
    let slow = server.mock(|when, then| {
        when.method(GET).path("/electrical_profile_set/2/");
        then.status(200)
            .header("Content-Type", "application/json")
            .delay(Duration::from_secs(2))
            .json_body(profiles_body());
    });

    let client = Arc::new(ProfileSetClient::new(&server.base_url(), None).unwrap());
    client.profile_mapping(1).await.unwrap();

    let download = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.profile_mapping(2).await })
    };
    // 讓慢速下載先開始
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    let mapping = client.profile_mapping(1).await.unwrap();
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "cached lookup waited {:?}",
        started.elapsed()
    );
    assert_eq!(mapping.value_at("1", "track", 5.0), Some("25000"));
    assert!(!client.is_cached(2));

    download.await.unwrap().unwrap();
    assert!(client.is_cached(2));

    cached.assert_hits(1);
    slow.assert_hits(1);
}

#[test]
fn test_rejects_invalid_base_url() {
    assert!(ProfileSetClient::new("not a url", None).is_err());
    assert!(ProfileSetClient::new("ftp://example.com", None).is_err());
}
