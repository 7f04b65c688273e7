//! HTTP client for the backend
//!
//! Every call carries the session cookie jar; the jar is owned by the
//! `reqwest` client and never read by this crate. JSON API responses may be
//! wrapped in the backend's envelope:
//!
//! ```json
//! { "success": true, "code": 200, "data": { ... }, "message": "..." }
//! ```
//!
//! The envelope is unwrapped here so callers only ever see `data`.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::domain::result::FetchError;
use crate::domain::session::AuthHeader;
use crate::ports::BackendApi;

/// Request timeout for every backend call
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const MENU_PATH: &str = "/get/menu.json";
pub const USER_INFO_PATH: &str = "/api/userinfo";
pub const LOGOUT_PATH: &str = "/logout";

/// The backend's response envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    code: i64,
    #[serde(default)]
    data: JsonValue,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    additional: Option<JsonValue>,
}

impl Envelope {
    fn has_error(&self) -> bool {
        !self.success || !(200..=399).contains(&self.code)
    }

    /// `message`, followed by `additional` when that is a string
    fn error_message(&self) -> String {
        let message = self.message.clone().unwrap_or_default();
        let message = match &self.additional {
            Some(JsonValue::String(extra)) if !extra.is_empty() => {
                format!("{} {}", message, extra).trim().to_string()
            }
            _ => message,
        };
        if message.is_empty() {
            "Request failed".to_string()
        } else {
            message
        }
    }
}

/// Whether `body` looks like an envelope rather than a bare payload
fn is_envelope(body: &JsonValue) -> bool {
    body.get("success").map_or(false, JsonValue::is_boolean)
        && body.get("code").map_or(false, JsonValue::is_number)
}

/// Strip the envelope from a decoded body. Bodies without one pass through.
pub fn unwrap_envelope(body: JsonValue) -> std::result::Result<JsonValue, FetchError> {
    if !is_envelope(&body) {
        return Ok(body);
    }
    let envelope: Envelope =
        serde_json::from_value(body).map_err(|e| FetchError::decode(e.to_string()))?;
    if envelope.has_error() {
        return Err(FetchError::Api { message: envelope.error_message() });
    }
    Ok(envelope.data)
}

/// Blocking HTTP implementation of [`BackendApi`]
#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(request: RequestBuilder, auth: Option<&AuthHeader>) -> RequestBuilder {
        match auth {
            Some(header) => request.header(header.name.as_str(), header.value.as_str()),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> std::result::Result<Response, FetchError> {
        let response = request.send().map_err(|e| self.map_request_error(e))?;
        self.check_response_status(&response)?;
        Ok(response)
    }

    /// Decode a response body; an empty body decodes to `None`
    fn read_json(response: Response) -> std::result::Result<Option<JsonValue>, FetchError> {
        let text = response.text().map_err(|e| FetchError::decode(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| FetchError::decode(e.to_string()))
    }

    fn map_request_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::transport(format!(
                "Connection timed out after {} seconds",
                REQUEST_TIMEOUT_SECS
            ))
        } else if error.is_connect() {
            FetchError::transport(format!("Unable to connect to {}", self.base_url))
        } else {
            FetchError::transport(error.to_string())
        }
    }

    fn check_response_status(&self, response: &Response) -> std::result::Result<(), FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = match status.as_u16() {
            401 => "Not signed in".to_string(),
            403 => "Access denied".to_string(),
            404 => format!("{} not found", response.url().path()),
            _ => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };
        Err(FetchError::Status { status: status.as_u16(), message })
    }
}

impl BackendApi for HttpBackend {
    fn get_menu(&self) -> std::result::Result<JsonValue, FetchError> {
        let response = self.send(self.client.get(self.url(MENU_PATH)))?;
        Ok(Self::read_json(response)?.unwrap_or(JsonValue::Null))
    }

    fn get_user_info(
        &self,
        auth: Option<&AuthHeader>,
    ) -> std::result::Result<Option<JsonValue>, FetchError> {
        let request = Self::with_auth(self.client.get(self.url(USER_INFO_PATH)), auth);
        let response = self.send(request)?;
        match Self::read_json(response)? {
            Some(body) => match unwrap_envelope(body)? {
                JsonValue::Null => Ok(None),
                data => Ok(Some(data)),
            },
            None => Ok(None),
        }
    }

    fn logout(&self, auth: Option<&AuthHeader>) -> std::result::Result<(), FetchError> {
        let request = self
            .client
            .post(self.url(LOGOUT_PATH))
            .json(&serde_json::json!({}));
        let response = self.send(Self::with_auth(request, auth))?;
        if let Some(body) = Self::read_json(response)? {
            unwrap_envelope(body)?;
        }
        Ok(())
    }
}
