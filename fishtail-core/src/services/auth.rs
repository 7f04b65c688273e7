//! Auth service - session state and backend auth redirects
//!
//! The backend owns sign-in. This service only sends the browser to the
//! backend's auth pages, picks up the user the backend hands back (either
//! in the redirect URL or from `/api/userinfo`), and mirrors it to local
//! storage.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use url::form_urlencoded;

use crate::adapters::http::USER_INFO_PATH;
use crate::domain::query::{decode_component, first_param, QueryParams};
use crate::domain::result::{FetchError, Result};
use crate::domain::session::{keys, AuthHeader};
use crate::domain::{GuardState, RouteGuard, SessionState, User};
use crate::ports::{BackendApi, KeyValueStore, Navigator};
use crate::services::logging::{events, record, LogEvent, LoggingService};

/// Route the backend sends the user back to after signing in
pub const POST_LOGIN_ROUTE: &str = "/#/dashboard";

/// Backend auth page URLs for the current location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrls {
    pub login: String,
    pub register: String,
    pub forgot_password: String,
}

pub struct AuthService {
    backend: Arc<dyn BackendApi>,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    auth_base: String,
    state: RwLock<SessionState>,
    /// Set once initialization has run; held while it runs
    initialized: Mutex<bool>,
    logger: Option<Arc<LoggingService>>,
}

impl AuthService {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        auth_base: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            store,
            navigator,
            auth_base: auth_base.into().trim_end_matches('/').to_string(),
            state: RwLock::new(SessionState::loading()),
            initialized: Mutex::new(false),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    fn logger(&self) -> Option<&LoggingService> {
        self.logger.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn is_logged_in(&self) -> bool {
        self.state().is_logged_in()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user
    }

    /// Derive the session once per service lifetime. Later calls return the
    /// current state without touching the backend.
    pub fn initialize(&self, params: &QueryParams) -> SessionState {
        let mut initialized = self.initialized.lock().unwrap_or_else(PoisonError::into_inner);
        if *initialized {
            return self.state();
        }

        let state = match Self::redirect_user(params) {
            Some(user) => {
                self.persist_user(&user);
                if let Some(token) = first_param(params, "session_token").filter(|t| !t.is_empty()) {
                    self.store_quietly(keys::SESSION_TOKEN, token);
                }
                record(self.logger(), LogEvent::new(events::SESSION_INITIALIZED));
                SessionState::signed_in(user)
            }
            None => self.fetch_session(),
        };

        self.set_state(state.clone());
        *initialized = true;
        state
    }

    /// The user handed back in a successful sign-in redirect. The backend
    /// encodes `username` once more on top of the query encoding; a value
    /// that does not decode is treated as no payload.
    fn redirect_user(params: &QueryParams) -> Option<User> {
        if first_param(params, "success") != Some("true") {
            return None;
        }
        let user_id = first_param(params, "user_id").filter(|v| !v.is_empty())?;
        let username = first_param(params, "username").filter(|v| !v.is_empty())?;
        let email = decode_component(username)?;
        Some(User::from_redirect_payload(user_id, &email))
    }

    fn fetch_session(&self) -> SessionState {
        match self.backend.get_user_info(self.legacy_header().as_ref()) {
            Ok(info) => match info.as_ref().and_then(User::from_user_info) {
                Some(user) => {
                    self.persist_user(&user);
                    record(
                        self.logger(),
                        LogEvent::new(events::SESSION_INITIALIZED).with_endpoint(USER_INFO_PATH),
                    );
                    SessionState::signed_in(user)
                }
                None => SessionState::signed_out(),
            },
            Err(e) => {
                record(
                    self.logger(),
                    LogEvent::new(events::SESSION_INIT_FAILED)
                        .with_endpoint(USER_INFO_PATH)
                        .with_error(e.to_string())
                        .with_error_details(e.kind()),
                );
                SessionState::signed_out()
            }
        }
    }

    /// Header credential from storage, if a legacy sign-in left one
    fn legacy_header(&self) -> Option<AuthHeader> {
        let read = |key| self.store.get(key).ok().flatten();
        AuthHeader::from_stored(
            read(keys::TOKEN_TYPE).as_deref(),
            read(keys::TOKEN).as_deref(),
            read(keys::HEADER).as_deref(),
        )
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store_quietly(keys::USER, &json),
            Err(e) => record(self.logger(), LogEvent::new(events::STORAGE_FAILED).with_error(e.to_string())),
        }
    }

    /// Storage is a mirror; failing to write it never fails the session
    fn store_quietly(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            record(self.logger(), LogEvent::new(events::STORAGE_FAILED).with_error(e.to_string()));
        }
    }

    /// The user mirrored in local storage. Display only: this is not proof
    /// of a live session.
    pub fn stored_user(&self) -> Option<User> {
        let json = self.store.get(keys::USER).ok().flatten()?;
        serde_json::from_str(&json).ok()
    }

    fn auth_url(&self, action: &str, params: &[(&str, &str)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        format!("{}/auth/{}?{}", self.auth_base, action, query.finish())
    }

    pub fn auth_urls(&self) -> AuthUrls {
        let href = self.navigator.current_href();
        let dashboard = format!("{}{}", self.navigator.origin(), POST_LOGIN_ROUTE);
        AuthUrls {
            login: self.auth_url("login", &[("redirect", &dashboard)]),
            register: self.auth_url("register", &[("redirect", &href)]),
            forgot_password: self.auth_url("forgot-password", &[("redirect", &href)]),
        }
    }

    pub fn verify_email_url(&self, token: &str) -> String {
        let href = self.navigator.current_href();
        self.auth_url("verify-email", &[("token", token), ("redirect", &href)])
    }

    fn redirect(&self, action: &str, url: String) {
        record(
            self.logger(),
            LogEvent::new(events::AUTH_REDIRECT).with_endpoint(format!("/auth/{}", action)),
        );
        self.navigator.navigate(&url);
    }

    pub fn login(&self) {
        self.redirect("login", self.auth_urls().login);
    }

    pub fn register(&self) {
        self.redirect("register", self.auth_urls().register);
    }

    pub fn forgot_password(&self) {
        self.redirect("forgot-password", self.auth_urls().forgot_password);
    }

    pub fn verify_email(&self, token: &str) {
        self.redirect("verify-email", self.verify_email_url(token));
    }

    /// Sign out. The backend call is best-effort: local state is cleared and
    /// the browser sent home whatever it returns. The backend error, if any,
    /// is handed back for display.
    pub fn logout(&self) -> std::result::Result<(), FetchError> {
        let outcome = self.backend.logout(self.legacy_header().as_ref());
        if let Err(e) = &outcome {
            record(
                self.logger(),
                LogEvent::new(events::LOGOUT_FAILED)
                    .with_endpoint("/logout")
                    .with_error(e.to_string())
                    .with_error_details(e.kind()),
            );
        }

        self.set_state(SessionState::signed_out());
        for key in keys::ALL {
            if let Err(e) = self.store.remove(key) {
                record(self.logger(), LogEvent::new(events::STORAGE_FAILED).with_error(e.to_string()));
            }
        }
        record(self.logger(), LogEvent::new(events::LOGOUT_COMPLETED));

        self.navigator.navigate(&format!("{}/", self.navigator.origin()));
        outcome
    }

    /// Evaluate `guard` for `route` against the current session, starting
    /// the login redirect when the route needs a session and there is none
    pub fn guard(&self, guard: &RouteGuard, route: &str) -> GuardState {
        let outcome = guard.evaluate(&self.state());
        match &outcome {
            GuardState::Redirecting => {
                record(self.logger(), LogEvent::new(events::ROUTE_GUARDED).with_route(route));
                self.login();
            }
            GuardState::RoleRejected { .. } => {
                record(self.logger(), LogEvent::new(events::ROUTE_GUARDED).with_route(route));
            }
            GuardState::Loading | GuardState::Authorized => {}
        }
        outcome
    }

    /// Forget the in-memory session so the next `initialize` runs again,
    /// as a page reload would. Storage is left alone.
    pub fn reset(&self) {
        let mut initialized = self.initialized.lock().unwrap_or_else(PoisonError::into_inner);
        self.set_state(SessionState::loading());
        *initialized = false;
    }

    /// Persist a user directly, as the embedding app would after an
    /// out-of-band sign-in
    pub fn remember_user(&self, user: User) -> Result<()> {
        self.store.set(keys::USER, &serde_json::to_string(&user)?)?;
        self.set_state(SessionState::signed_in(user));
        Ok(())
    }
}
