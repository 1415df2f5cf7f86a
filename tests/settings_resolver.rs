//! Settings resolution against a mock backend.
//!
//! Covers server URL precedence, cache lifecycle, and the rule that the
//! backend never gets to choose the server URL.

use contextos::storage::StorageResult;
use contextos::{
    ApiError, Backend, KeyValueStore, MemoryStore, SettingsResolver, SettingsUpdate, SqliteStore,
    StorageError, SERVER_URL_KEY,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEFAULT_URL: &str = "http://127.0.0.1:9";

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable)
    }
    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }
    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }
}

fn resolver_with(store: Arc<dyn KeyValueStore>) -> SettingsResolver {
    SettingsResolver::new(store, Backend::new().unwrap(), DEFAULT_URL)
}

fn resolver_for(server: &MockServer) -> (SettingsResolver, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.set(SERVER_URL_KEY, &server.uri()).unwrap();
    (resolver_with(store.clone()), store)
}

#[test]
fn broken_storage_resolves_default() {
    let resolver = resolver_with(Arc::new(BrokenStore));
    assert_eq!(resolver.resolve_server_url(), DEFAULT_URL);
    resolver.reset_server_url();
    assert!(resolver.peek_cache().is_none());
}

#[tokio::test]
async fn load_merges_keys_with_local_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .and(header("ngrok-skip-browser-warning", "69420"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "togetherApiKey": "tk",
            "groqApiKey": "gk",
            "serverUrl": "http://somewhere-else"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (resolver, _store) = resolver_for(&server);
    let settings = resolver.load_settings().await;

    assert_eq!(settings.together_api_key, "tk");
    assert_eq!(settings.groq_api_key, "gk");
    assert_eq!(settings.server_url, server.uri());
    assert_eq!(resolver.peek_cache(), Some(settings));
}

#[tokio::test]
async fn load_failure_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (resolver, _store) = resolver_for(&server);
    let settings = resolver.load_settings().await;

    assert_eq!(settings.together_api_key, "");
    assert_eq!(settings.groq_api_key, "");
    assert_eq!(settings.server_url, server.uri());
    assert!(resolver.peek_cache().is_none());
}

#[tokio::test]
async fn load_unreachable_backend_returns_fallback() {
    let resolver = resolver_with(Arc::new(MemoryStore::new()));
    let settings = resolver.load_settings().await;
    assert_eq!(settings.server_url, DEFAULT_URL);
    assert_eq!(settings.together_api_key, "");
}

#[tokio::test]
async fn load_undecodable_body_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>tunnel warning</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (resolver, _store) = resolver_for(&server);
    let settings = resolver.load_settings().await;

    assert_eq!(settings.together_api_key, "");
    assert_eq!(settings.groq_api_key, "");
    assert_eq!(settings.server_url, server.uri());
    assert!(resolver.peek_cache().is_none());
}

#[tokio::test]
async fn save_continues_when_url_cannot_be_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .and(body_json(json!({"groqApiKey": "g"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": {"groqApiKey": "g"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_with(Arc::new(BrokenStore));
    let saved = resolver
        .save_settings(SettingsUpdate {
            groq_api_key: Some("g".into()),
            server_url: Some(server.uri()),
            ..SettingsUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(saved.groq_api_key, "g");
    assert_eq!(saved.server_url, server.uri());
    assert_eq!(resolver.peek_cache(), Some(saved));
    assert_eq!(resolver.resolve_server_url(), DEFAULT_URL);
}

#[tokio::test]
async fn save_persists_trimmed_url_and_posts_keys_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .and(body_json(json!({"groqApiKey": "new-g"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": {"togetherApiKey": "tk", "groqApiKey": "new-g", "serverUrl": "http://evil"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store.clone());

    let saved = resolver
        .save_settings(SettingsUpdate {
            groq_api_key: Some("new-g".into()),
            server_url: Some(format!("  {}  ", server.uri())),
            ..SettingsUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(store.get(SERVER_URL_KEY).unwrap(), Some(server.uri()));
    assert_eq!(resolver.resolve_server_url(), server.uri());
    assert_eq!(saved.server_url, server.uri());
    assert_eq!(saved.groq_api_key, "new-g");
    assert_eq!(resolver.peek_cache(), Some(saved));
}

#[tokio::test]
async fn save_without_url_targets_stored_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": {"togetherApiKey": "t2"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (resolver, store) = resolver_for(&server);
    let saved = resolver
        .save_settings(SettingsUpdate {
            together_api_key: Some("t2".into()),
            ..SettingsUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(saved.together_api_key, "t2");
    assert_eq!(saved.groq_api_key, "");
    assert_eq!(store.get(SERVER_URL_KEY).unwrap(), Some(server.uri()));
}

#[tokio::test]
async fn save_with_blank_url_persists_default() {
    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store.clone());

    let result = resolver
        .save_settings(SettingsUpdate {
            server_url: Some("   ".into()),
            ..SettingsUpdate::default()
        })
        .await;

    assert!(matches!(result, Err(ApiError::Network(_))));
    assert_eq!(store.get(SERVER_URL_KEY).unwrap().as_deref(), Some(DEFAULT_URL));
}

#[tokio::test]
async fn save_http_error_is_returned_and_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad key"))
        .mount(&server)
        .await;

    let (resolver, _store) = resolver_for(&server);
    let err = resolver
        .save_settings(SettingsUpdate::default())
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad key");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(resolver.peek_cache().is_none());
}

#[tokio::test]
async fn clear_cache_forces_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groqApiKey": "g"})))
        .expect(2)
        .mount(&server)
        .await;

    let (resolver, _store) = resolver_for(&server);
    resolver.load_settings().await;
    assert!(resolver.peek_cache().is_some());

    resolver.clear_cache();
    assert!(resolver.peek_cache().is_none());

    resolver.load_settings().await;
    assert_eq!(resolver.peek_cache().map(|s| s.groq_api_key), Some("g".to_string()));
}

#[test]
fn sqlite_backed_url_survives_new_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("contextos.db");

    let store = SqliteStore::open(&db).unwrap();
    store.set(SERVER_URL_KEY, " http://persisted:8080 ").unwrap();
    drop(store);

    let resolver = resolver_with(Arc::new(SqliteStore::open(&db).unwrap()));
    assert_eq!(resolver.resolve_server_url(), "http://persisted:8080");

    resolver.reset_server_url();
    let resolver = resolver_with(Arc::new(SqliteStore::open(&db).unwrap()));
    assert_eq!(resolver.resolve_server_url(), DEFAULT_URL);
}
