//! Layout shell selection

use serde::{Deserialize, Serialize};

use super::session::SessionState;
use super::user::Role;

/// Kind of route being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Marketing and community pages
    Public,
    /// Sign-in, registration and recovery pages
    Auth,
    /// Anything behind the route guard
    Protected,
}

/// Page shell wrapped around a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Auth,
    Landing,
    User,
    Admin,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Auth => "auth",
            LayoutKind::Landing => "landing",
            LayoutKind::User => "user",
            LayoutKind::Admin => "admin",
        }
    }
}

impl Role {
    /// Shell used for signed-in pages
    pub fn layout(&self) -> LayoutKind {
        match self {
            Role::Admin => LayoutKind::Admin,
            Role::User | Role::Provider => LayoutKind::User,
        }
    }
}

pub fn select_layout(route: RouteKind, session: &SessionState) -> LayoutKind {
    match (route, session.role()) {
        (RouteKind::Auth, _) => LayoutKind::Auth,
        (RouteKind::Public, _) | (RouteKind::Protected, None) => LayoutKind::Landing,
        (RouteKind::Protected, Some(role)) => role.layout(),
    }
}
