//! User and role domain model

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Role of a signed-in user. Wire form is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Provider,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Provider, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Provider => "provider",
            Role::Admin => "admin",
        }
    }

    /// Parse a wire role, case-insensitively
    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "provider" => Some(Role::Provider),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Role from an optional wire value; missing or unrecognized roles get
    /// the least privileged role.
    pub fn from_wire(value: Option<&str>) -> Role {
        value.and_then(Role::parse).unwrap_or(Role::User)
    }

    /// Where a signed-in user lands when a route rejects their role
    pub fn fallback_route(&self) -> &'static str {
        match self {
            Role::User | Role::Provider | Role::Admin => "/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user, as mirrored into local storage under `user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            role,
        }
    }

    /// Build the user carried by a post-login redirect. The payload has no
    /// names or role, so the role defaults to `user`.
    pub fn from_redirect_payload(user_id: &str, username: &str) -> Self {
        Self::new(user_id, username, Role::User)
    }

    /// Build a user from the session-info endpoint body.
    ///
    /// Returns `None` when the body carries no user: anything other than an
    /// object, or an object with neither `id` nor `email`.
    pub fn from_user_info(info: &JsonValue) -> Option<Self> {
        let obj = info.as_object()?;
        if !obj.contains_key("id") && !obj.contains_key("email") {
            return None;
        }

        let text = |key: &str| obj.get(key).map(scalar_to_string).unwrap_or_default();

        Some(Self {
            id: text("id"),
            email: text("email"),
            first_name: text("firstName"),
            last_name: text("lastName"),
            role: Role::from_wire(obj.get("role").and_then(|r| r.as_str())),
        })
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Render a JSON scalar the way a loosely typed backend field is shown:
/// strings as-is, numbers and booleans as text, anything else empty.
pub(crate) fn scalar_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
