//! Backend API port

use serde_json::Value as JsonValue;

use crate::domain::result::FetchError;
use crate::domain::session::AuthHeader;

/// The remote backend the client talks to
///
/// Session cookies are the implementation's business: callers never see
/// them. `auth` carries the legacy header credential when one is stored.
pub trait BackendApi: Send + Sync {
    /// `GET /get/menu.json`, decoded but otherwise untouched
    fn get_menu(&self) -> Result<JsonValue, FetchError>;

    /// `GET /api/userinfo`, unwrapped from the response envelope.
    /// `Ok(None)` means the backend answered without a user.
    fn get_user_info(&self, auth: Option<&AuthHeader>) -> Result<Option<JsonValue>, FetchError>;

    /// `POST /logout`
    fn logout(&self, auth: Option<&AuthHeader>) -> Result<(), FetchError>;
}
