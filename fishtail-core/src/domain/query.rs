//! Query-parameter extraction for hash-routed URLs
//!
//! The app uses hash routing, so the backend appends its post-login payload
//! after the fragment (`…/#/dashboard?success=true&user_id=…`). That query
//! wins over a regular `?k=v` search part, which is only consulted when the
//! fragment carries no query of its own.

use std::collections::BTreeMap;
use std::sync::Mutex;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Value of a query key: a single value, or every value in encounter order
/// once the key repeats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// First value seen for the key
    pub fn first(&self) -> &str {
        match self {
            QueryValue::Single(value) => value,
            QueryValue::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                *self = QueryValue::Multi(vec![std::mem::take(first), value]);
            }
            QueryValue::Multi(values) => values.push(value),
        }
    }
}

/// Parsed query parameters
pub type QueryParams = BTreeMap<String, QueryValue>;

/// First value of `key`, if present
pub fn first_param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params.get(key).map(QueryValue::first)
}

/// Percent-decode a single URI component. `+` is left alone. Returns `None`
/// for a malformed escape or bytes that are not UTF-8.
pub fn decode_component(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    });
    if !well_formed {
        return None;
    }
    percent_decode_str(value).decode_utf8().ok().map(|decoded| decoded.into_owned())
}

/// The raw query string to parse for `href`
fn query_string(href: &str) -> &str {
    let (before_hash, fragment) = match href.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (href, None),
    };

    if let Some((_, query)) = fragment.and_then(|f| f.split_once('?')) {
        if !query.is_empty() {
            return query;
        }
    }

    before_hash.split_once('?').map(|(_, query)| query).unwrap_or("")
}

/// Parse the query parameters of `href` (form-urlencoded rules)
pub fn extract_query_params(href: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in url::form_urlencoded::parse(query_string(href).as_bytes()) {
        let value = value.into_owned();
        match params.get_mut(&*key) {
            Some(existing) => existing.push(value),
            None => {
                params.insert(key.into_owned(), QueryValue::Single(value));
            }
        }
    }
    params
}

/// Query parameters of the current location, re-parsed only when the
/// location changes
#[derive(Debug, Default)]
pub struct QueryProvider {
    cached: Mutex<Option<(String, QueryParams)>>,
}

impl QueryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self, href: &str) -> QueryParams {
        let mut cached = match self.cached.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some((cached_href, params)) = cached.as_ref() {
            if cached_href == href {
                return params.clone();
            }
        }
        let params = extract_query_params(href);
        *cached = Some((href.to_string(), params.clone()));
        params
    }
}
