mod common;

use common::{envelope, link, raw_asset, raw_entry};
use serde_json::json;
use std::sync::Arc;
use tux_overrides::OverrideStore;
use tux_query::{ContentTransport, HttpTransport, QueryApi, QueryConfig, QueryError, QueryParams};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> QueryConfig {
    QueryConfig {
        api_base_url: Some(server.uri()),
        ..QueryConfig::new("space1", "secret-token", "cdn")
    }
}

// ── Config ───────────────────────────────────────────────────────

#[test]
fn config_default() {
    let cfg = QueryConfig::default();
    assert_eq!(cfg.sub_domain, "cdn");
    assert_eq!(cfg.timeout_secs, 30);
    assert!(cfg.api_base_url.is_none());
    assert!(cfg.space.is_empty());
}

#[test]
fn config_base_url_uses_sub_domain() {
    let cfg = QueryConfig::new("abc", "tok", "preview");
    assert_eq!(cfg.base_url(), "https://preview.contentful.com/spaces/abc");
}

#[test]
fn config_base_url_override_trims_slash() {
    let cfg = QueryConfig {
        api_base_url: Some("http://localhost:9000/".to_string()),
        ..QueryConfig::new("abc", "tok", "cdn")
    };
    assert_eq!(cfg.base_url(), "http://localhost:9000/spaces/abc");
}

#[test]
fn config_debug_redacts_token() {
    let cfg = QueryConfig::new("abc", "super-secret", "cdn");
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("abc"));
}

#[test]
fn config_validation() {
    assert!(QueryConfig::new("abc", "tok", "cdn").validate().is_ok());
    assert!(matches!(
        QueryConfig::new("", "tok", "cdn").validate(),
        Err(QueryError::Config(_))
    ));
    assert!(QueryConfig::new("abc", " ", "cdn").validate().is_err());
    assert!(QueryConfig::new("abc", "tok", "").validate().is_err());
    let zero_timeout = QueryConfig {
        timeout_secs: 0,
        ..QueryConfig::new("abc", "tok", "cdn")
    };
    assert!(zero_timeout.validate().is_err());
}

#[test]
fn config_serde_roundtrip() {
    let cfg = QueryConfig::new("abc", "tok", "preview");
    let json = serde_json::to_string(&cfg).unwrap();
    let back: QueryConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.space, "abc");
    assert_eq!(back.sub_domain, "preview");
    assert_eq!(back.api_base_url, None);
}

#[test]
fn transport_rejects_invalid_config() {
    assert!(HttpTransport::new(&QueryConfig::default()).is_err());
}

// ── HTTP transport ───────────────────────────────────────────────

#[tokio::test]
async fn sends_bearer_token_and_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries"))
        .and(header("authorization", "Bearer secret-token"))
        .and(query_param("content_type", "page"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "includes": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config_for(&server)).unwrap();
    let body = transport
        .get("/entries", &QueryParams::new().content_type("page").limit(5))
        .await
        .unwrap();
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config_for(&server)).unwrap();
    let err = transport
        .get("/entries/missing", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        QueryError::Status { context, body, .. } => {
            assert_eq!(context, "GET /entries/missing");
            assert_eq!(body, "not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config_for(&server)).unwrap();
    let err = transport.get("/entries", &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, QueryError::MalformedResponse { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let cfg = QueryConfig {
        api_base_url: Some("http://127.0.0.1:1".to_string()),
        timeout_secs: 2,
        ..QueryConfig::new("space1", "tok", "cdn")
    };
    let transport = HttpTransport::new(&cfg).unwrap();
    let err = transport.get("/entries", &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, QueryError::Transport { .. }));
    assert!(err.to_string().contains("GET /entries"));
}

// ── End to end ───────────────────────────────────────────────────

#[tokio::test]
async fn collection_is_overridden_and_hydrated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            vec![raw_entry(
                "e1",
                "2020-01-01",
                json!({"title": "server", "icon": link("a1", "Asset")}),
            )],
            vec![raw_asset("a1", "2020-01-01", "X")],
            vec![],
        )))
        .mount(&server)
        .await;

    let store = Arc::new(OverrideStore::new());
    let api = QueryApi::connect(&config_for(&server), store.clone()).unwrap();

    let result = api.get_entries(&QueryParams::new()).await.unwrap();
    assert_eq!(result.items[0].get_str("/icon/fields/title").as_deref(), Some("X"));

    let mut edited = result.items[0].clone();
    edited.sys = edited.sys.with_updated_at("2020-05-01");
    edited.fields.insert("title".to_string(), "edited".into());
    api.override_entry(edited).unwrap();

    let reloaded = api.get_entries(&QueryParams::new()).await.unwrap();
    assert_eq!(reloaded.items[0].get_str("/title").as_deref(), Some("edited"));
    assert_eq!(reloaded.items[0].get_str("/icon/fields/title").as_deref(), Some("X"));
}

#[tokio::test]
async fn single_entry_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries/e1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(raw_entry("e1", "2020-01-01", json!({"title": "old"}))),
        )
        .mount(&server)
        .await;

    let api = QueryApi::connect(&config_for(&server), Arc::new(OverrideStore::new())).unwrap();
    let entry = api.get_entry("e1").await.unwrap();
    assert_eq!(entry.get_str("/title").as_deref(), Some("old"));
}

#[tokio::test]
async fn entry_id_is_sent_as_one_escaped_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries/..%2Fassets%2Fa1%3Flocale%3Dde"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(raw_entry("../assets/a1?locale=de", "2020-01-01", json!({"title": "odd"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = QueryApi::connect(&config_for(&server), Arc::new(OverrideStore::new())).unwrap();
    let entry = api.get_entry("../assets/a1?locale=de").await.unwrap();
    assert_eq!(entry.get_str("/title").as_deref(), Some("odd"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}
