//! Session persistence against a real HTTP service and on-disk storage.

use std::sync::Arc;

use avis_core::{
    AppMode, AuthStatus, Config, FileSessionStorage, Orchestrator, ReputationService,
    SearchStatus, SessionStore,
};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn service() -> (MockServer, Arc<ReputationService>) {
    let server = MockServer::start().await;
    let config = Config::new(&server.uri()).unwrap();
    (server, Arc::new(ReputationService::from_config(&config)))
}

#[tokio::test]
async fn test_login_survives_restart() {
    let (server, api) = service().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "jwt-abc",
            "user": {"id": 12, "email": "pro@example.com", "company": "Colis Express"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let first = Orchestrator::bootstrap(api.clone(), Arc::new(FileSessionStorage::new(dir.path())));
    assert_eq!(first.mode(), AppMode::Unauthenticated);
    assert_eq!(
        first.login("pro@example.com", "secret1").await,
        AuthStatus::Succeeded
    );
    let established = first.session().unwrap();

    // Fresh store over the same directory, as after a process restart
    let fresh = SessionStore::new(Arc::new(FileSessionStorage::new(dir.path())));
    let loaded = fresh.load().unwrap().unwrap();
    assert_eq!(loaded.token, established.token);
    assert_eq!(loaded.user, established.user);

    let second = Orchestrator::bootstrap(api, Arc::new(FileSessionStorage::new(dir.path())));
    assert_eq!(second.mode(), AppMode::Authenticated);
}

#[tokio::test]
async fn test_expired_token_removes_persisted_files() {
    let (server, api) = service().await;
    Mock::given(method("GET"))
        .and(path("/api/avis/0612345678"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "Token expiré"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("token"), "stale").unwrap();
    std::fs::write(
        dir.path().join("user.json"),
        r#"{"id": 12, "email": "pro@example.com"}"#,
    )
    .unwrap();

    let orchestrator = Orchestrator::bootstrap(api, Arc::new(FileSessionStorage::new(dir.path())));
    assert_eq!(orchestrator.mode(), AppMode::Authenticated);

    assert_eq!(
        orchestrator.search("0612345678").await,
        SearchStatus::Unauthorized
    );
    assert_eq!(orchestrator.mode(), AppMode::Unauthenticated);
    assert!(!dir.path().join("token").exists());
    assert!(!dir.path().join("user.json").exists());
}

#[tokio::test]
async fn test_corrupt_session_starts_unauthenticated() {
    let (_server, api) = service().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("token"), "jwt-abc").unwrap();
    std::fs::write(dir.path().join("user.json"), "{broken").unwrap();

    let orchestrator = Orchestrator::bootstrap(api, Arc::new(FileSessionStorage::new(dir.path())));

    assert_eq!(orchestrator.mode(), AppMode::Unauthenticated);
    assert!(!dir.path().join("token").exists());
}
