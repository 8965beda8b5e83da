//! Session restore across launches, backed by the JSON session file.

mod common;

use binderbuilder::app::Route;
use binderbuilder::domain::Credentials;
use binderbuilder::storage::{JsonStorage, SessionStorage};
use binderbuilder::ui::viewmodel::Screen;
use binderbuilder::Event;
use common::{runtime, FakeBackend, PASSWORD, TOKEN};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn storage(dir: &TempDir) -> Box<JsonStorage> {
    Box::new(JsonStorage::new(dir.path().join("session.json")).unwrap())
}

fn session_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("session.json")
}

fn write_session(path: &Path, json: &str) {
    std::fs::write(path, json).unwrap();
}

#[tokio::test]
async fn login_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(FakeBackend::default());

    {
        let mut first = runtime(&backend, storage(&dir));
        first.start();
        first.run_until_idle().await;
        first.dispatch(Event::SubmitLogin(Credentials::new("ash", PASSWORD)));
        first.run_until_idle().await;
        assert!(first.state().session.is_authenticated());
    }
    assert!(session_file(&dir).exists());

    let mut second = runtime(&backend, storage(&dir));
    second.start();
    assert!(second.state().session.is_loading());
    second.run_until_idle().await;

    let state = second.state();
    assert!(state.session.is_authenticated());
    assert_eq!(state.session.user().map(|u| u.username.as_str()), Some("ash"));
    assert_eq!(backend.calls("current_user"), 1);
    assert_eq!(backend.calls("list_collections"), 2);
    assert_eq!(state.resolver.default_id(), Some(7));
}

#[tokio::test]
async fn protected_route_waits_for_restore_instead_of_redirecting() {
    let dir = TempDir::new().unwrap();
    write_session(
        &session_file(&dir),
        &format!(r#"{{"version":1,"user":{{"id":1,"username":"ash"}},"token":"{TOKEN}","saved_at":0}}"#),
    );
    let backend = Arc::new(FakeBackend::default());
    let mut runtime = runtime(&backend, storage(&dir));

    runtime.start();
    runtime.dispatch(Event::Navigate(Route::Collection));

    assert_eq!(runtime.viewmodel().screen, Screen::Loading);
    assert_eq!(runtime.location(), Route::Collection);

    runtime.run_until_idle().await;

    assert_eq!(runtime.location(), Route::Collection);
    assert_eq!(backend.calls("get_collection"), 1);
    assert!(matches!(runtime.viewmodel().screen, Screen::Collection(_)));
}

#[tokio::test]
async fn orphaned_token_is_cleared_without_contacting_the_backend() {
    let dir = TempDir::new().unwrap();
    write_session(
        &session_file(&dir),
        &format!(r#"{{"version":1,"token":"{TOKEN}","saved_at":0}}"#),
    );
    let backend = Arc::new(FakeBackend::default());
    let mut runtime = runtime(&backend, storage(&dir));

    runtime.start();
    runtime.run_until_idle().await;

    assert!(!runtime.state().session.is_authenticated());
    assert!(!runtime.state().session.is_loading());
    assert!(!session_file(&dir).exists());
    assert_eq!(backend.calls("current_user"), 0);
}

#[tokio::test]
async fn rejected_token_is_forgotten() {
    let dir = TempDir::new().unwrap();
    write_session(
        &session_file(&dir),
        r#"{"version":1,"user":{"id":1,"username":"ash"},"token":"revoked","saved_at":0}"#,
    );
    let backend = Arc::new(FakeBackend::default());
    let mut runtime = runtime(&backend, storage(&dir));

    runtime.start();
    runtime.run_until_idle().await;

    assert!(!runtime.state().session.is_authenticated());
    assert!(!session_file(&dir).exists());
    assert_eq!(backend.calls("list_collections"), 0);
}

#[tokio::test]
async fn unreachable_backend_keeps_the_session_file() {
    let dir = TempDir::new().unwrap();
    write_session(
        &session_file(&dir),
        &format!(r#"{{"version":1,"user":{{"id":1,"username":"ash"}},"token":"{TOKEN}","saved_at":0}}"#),
    );
    let backend = Arc::new(FakeBackend::unreachable());
    let mut runtime = runtime(&backend, storage(&dir));

    runtime.start();
    runtime.run_until_idle().await;

    assert!(!runtime.state().session.is_authenticated());
    assert!(session_file(&dir).exists());
    let notices = runtime.drain_notices();
    assert!(notices
        .iter()
        .any(|n| n.message.starts_with("Could not restore your session")));
}

#[tokio::test]
async fn unreadable_session_file_is_discarded() {
    let dir = TempDir::new().unwrap();
    write_session(&session_file(&dir), "{ not json");
    let backend = Arc::new(FakeBackend::default());
    let mut runtime = runtime(&backend, storage(&dir));

    runtime.start();
    runtime.run_until_idle().await;

    assert!(!runtime.state().session.is_loading());
    assert!(!session_file(&dir).exists());
    assert_eq!(JsonStorage::new(session_file(&dir)).unwrap().load().unwrap(), None);
}
