//! Session lifecycle against a live (mock) HTTP backend
//!
//! Run with: cargo test --test session_test

mod common;

use std::sync::Arc;

use common::{MockBackend, MockConfig, MockResponse};
use fishtail_core::adapters::{HttpBackend, JsonFileStore, RecordingNavigator};
use fishtail_core::config::Config;
use fishtail_core::domain::session::keys;
use fishtail_core::domain::{select_layout, GuardState, LayoutKind, Role, RouteGuard, RouteKind};
use fishtail_core::ports::KeyValueStore;
use fishtail_core::services::{EntryPoint, LoggingService};
use fishtail_core::FishtailContext;
use tempfile::TempDir;

const USER_INFO: &str = "/api/userinfo";

struct App {
    _dir: TempDir,
    server: MockBackend,
    navigator: Arc<RecordingNavigator>,
    store: Arc<JsonFileStore>,
    ctx: FishtailContext,
}

fn app(config: MockConfig, href: &str) -> App {
    let dir = TempDir::new().unwrap();
    let server = MockBackend::start(config).unwrap();
    let navigator = Arc::new(RecordingNavigator::new(href));
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let config = Config {
        api_url: Some(server.base_url()),
        ..Config::default()
    };
    let backend = Arc::new(HttpBackend::new(&config.api_base()).unwrap());
    let logger = Arc::new(LoggingService::new(dir.path(), EntryPoint::Embedded, "test").unwrap());
    let ctx = FishtailContext::with_parts(config, backend, store.clone(), navigator.clone(), Some(logger));

    App { _dir: dir, server, navigator, store, ctx }
}

fn signed_in_config() -> MockConfig {
    MockConfig {
        user_info: MockResponse::ok(
            r#"{"success": true, "code": 200, "data": {"id": 7, "email": "admin@fishtail.example", "firstName": "Ang", "role": "admin"}}"#,
        ),
        ..MockConfig::default()
    }
}

#[test]
fn test_redirect_payload_signs_in_without_userinfo() {
    let app = app(
        MockConfig::default(),
        "http://localhost:8080/#/dashboard?success=true&user_id=42&username=foo%40bar.com",
    );

    let state = app.ctx.initialize_session();
    let user = state.user.unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.email, "foo@bar.com");
    assert_eq!(user.role, Role::User);
    assert_eq!(app.server.hits(USER_INFO), 0);

    let stored = app.store.get(keys::USER).unwrap().unwrap();
    assert!(stored.contains("foo@bar.com"));
}

#[test]
fn test_userinfo_envelope_signs_in() {
    let app = app(signed_in_config(), "http://localhost:8080/#/admin/users");

    let state = app.ctx.initialize_session();
    assert!(state.is_logged_in());
    assert_eq!(state.role(), Some(Role::Admin));
    assert_eq!(app.server.hits(USER_INFO), 1);

    assert_eq!(select_layout(RouteKind::Protected, &state), LayoutKind::Admin);
    assert_eq!(
        app.ctx.auth_service.guard(&RouteGuard::new([Role::Admin]), "/admin/users"),
        GuardState::Authorized
    );
}

#[test]
fn test_unauthorized_userinfo_redirects_protected_route_to_login() {
    let app = app(MockConfig::default(), "http://localhost:8080/#/my-requests");

    let state = app.ctx.initialize_session();
    assert!(!state.is_logged_in());
    assert!(!state.is_loading);

    let outcome = app.ctx.auth_service.guard(&RouteGuard::default(), "/my-requests");
    assert_eq!(outcome, GuardState::Redirecting);

    let login = app.navigator.last().unwrap();
    assert!(login.starts_with(&format!("{}/auth/login?redirect=", app.server.base_url())));
    assert!(login.ends_with("%2F%23%2Fdashboard"));

    let errors = app.ctx.logger.as_ref().unwrap().get_errors(10).unwrap();
    assert_eq!(errors[0].event, "session_init_failed");
}

#[test]
fn test_user_role_is_sent_back_to_dashboard() {
    let config = MockConfig {
        user_info: MockResponse::ok(r#"{"id": "3", "email": "u@fishtail.example"}"#),
        ..MockConfig::default()
    };
    let app = app(config, "http://localhost:8080/#/admin");

    app.ctx.initialize_session();
    assert_eq!(
        app.ctx.auth_service.guard(&RouteGuard::new([Role::Admin]), "/admin"),
        GuardState::RoleRejected { redirect_to: "/dashboard".to_string() }
    );
    assert!(app.navigator.history().is_empty());
}

#[test]
fn test_legacy_header_and_cookie_are_forwarded() {
    let config = MockConfig {
        menu: MockResponse::ok("[]").with_cookie("session_token=abc123; Path=/"),
        ..signed_in_config()
    };
    let app = app(config, "http://localhost:8080/#/dashboard");
    app.store.set(keys::TOKEN_TYPE, "Session").unwrap();
    app.store.set(keys::TOKEN, "legacy-token").unwrap();
    app.store.set(keys::HEADER, "X-Session-Token").unwrap();

    app.ctx.menu_service.fetch_menu_data();
    app.ctx.initialize_session();

    let request = &app.server.requests(USER_INFO)[0];
    assert!(request.contains("x-session-token: legacy-token"));
    assert!(request.contains("session_token=abc123"));
}

fn logout_clears_everything(logout: MockResponse) -> App {
    let app = app(MockConfig { logout, ..signed_in_config() }, "http://localhost:8080/#/dashboard");
    app.ctx.initialize_session();
    for key in keys::ALL {
        app.store.set(key, "x").unwrap();
    }
    app.store.set("theme", "dark").unwrap();

    let _ = app.ctx.auth_service.logout();

    assert!(!app.ctx.auth_service.is_logged_in());
    for key in keys::ALL {
        assert_eq!(app.store.get(key).unwrap(), None, "{} survived logout", key);
    }
    assert_eq!(app.store.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(app.navigator.last().as_deref(), Some("http://localhost:8080/"));
    assert_eq!(app.server.hits("/logout"), 1);
    app
}

#[test]
fn test_logout_success_clears_storage() {
    let app = logout_clears_everything(MockResponse::ok(r#"{"success": true, "code": 200}"#));
    let logger = app.ctx.logger.as_ref().unwrap();
    assert!(logger.get_errors(10).unwrap().is_empty());
}

#[test]
fn test_logout_failure_clears_storage() {
    let app = logout_clears_everything(MockResponse::status(500, r#"{"error": "boom"}"#));
    let logger = app.ctx.logger.as_ref().unwrap();
    assert_eq!(logger.get_errors(10).unwrap()[0].event, "logout_failed");
}

#[test]
fn test_reset_reinitializes() {
    let app = app(signed_in_config(), "http://localhost:8080/#/dashboard");

    app.ctx.initialize_session();
    app.ctx.initialize_session();
    assert_eq!(app.server.hits(USER_INFO), 1);

    app.ctx.auth_service.reset();
    assert!(app.ctx.auth_service.state().is_loading);
    app.ctx.initialize_session();
    assert_eq!(app.server.hits(USER_INFO), 2);
}
