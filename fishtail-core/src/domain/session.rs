//! Session state and the route guard state machine

use serde::{Deserialize, Serialize};

use super::user::{Role, User};

/// Storage keys owned by the session
pub mod keys {
    pub const USER: &str = "user";
    pub const SESSION_TOKEN: &str = "session_token";
    pub const TOKEN: &str = "token";
    pub const TOKEN_TYPE: &str = "tokenType";
    pub const HEADER: &str = "header";

    /// Everything removed on logout
    pub const ALL: [&str; 5] = [USER, SESSION_TOKEN, TOKEN, TOKEN_TYPE, HEADER];
}

/// Token type that marks a stored header credential as usable
pub const SESSION_TOKEN_TYPE: &str = "Session";

/// Header credential left in storage by older sign-in flows, sent as
/// `{name}: {value}` alongside the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: String,
    pub value: String,
}

impl AuthHeader {
    /// Build from the stored `tokenType`, `token` and `header` values.
    /// All three must be present and non-empty, with type `Session`.
    pub fn from_stored(
        token_type: Option<&str>,
        token: Option<&str>,
        header: Option<&str>,
    ) -> Option<Self> {
        match (token_type, token, header) {
            (Some(SESSION_TOKEN_TYPE), Some(token), Some(header))
                if !token.is_empty() && !header.is_empty() =>
            {
                Some(Self { name: header.to_string(), value: token.to_string() })
            }
            _ => None,
        }
    }
}

/// What the client knows about the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    /// True until initialization has finished
    pub is_loading: bool,
}

impl SessionState {
    pub fn loading() -> Self {
        Self { user: None, is_loading: true }
    }

    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user), is_loading: false }
    }

    pub fn signed_out() -> Self {
        Self { user: None, is_loading: false }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Outcome of guarding a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GuardState {
    /// Session initialization still in flight, or a route without an
    /// auth requirement reached with no session: keep showing the spinner
    Loading,
    /// Render the protected subtree
    Authorized,
    /// No session; a full-page redirect to the login flow is underway
    Redirecting,
    /// Signed in, but the role is not allowed here
    RoleRejected {
        #[serde(rename = "redirectTo")]
        redirect_to: String,
    },
}

/// Access rule for a group of routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGuard {
    /// Empty means any signed-in role
    pub allowed_roles: Vec<Role>,
    pub require_auth: bool,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self { allowed_roles: Vec::new(), require_auth: true }
    }
}

impl RouteGuard {
    pub fn new(allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        Self { allowed_roles: allowed_roles.into_iter().collect(), require_auth: true }
    }

    /// Routes that never start a login redirect. They still render only
    /// for a signed-in user; without one they stay `Loading`.
    pub fn public() -> Self {
        Self { allowed_roles: Vec::new(), require_auth: false }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }

    pub fn evaluate(&self, session: &SessionState) -> GuardState {
        if session.is_loading {
            return GuardState::Loading;
        }
        match &session.user {
            None if self.require_auth => GuardState::Redirecting,
            None => GuardState::Loading,
            Some(user) if self.permits(user.role) => GuardState::Authorized,
            Some(user) => GuardState::RoleRejected {
                redirect_to: user.role.fallback_route().to_string(),
            },
        }
    }
}
