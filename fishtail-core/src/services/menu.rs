//! Menu service - fetch, cache and normalize the restaurant menu
//!
//! The cache check and the fetch happen under one lock, so a `MenuService`
//! never has more than one menu request in flight: concurrent callers queue
//! on the lock and then find the fresh entry.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value as JsonValue;

use crate::adapters::http::MENU_PATH;
use crate::domain::menu::payload_to_raw_categories;
use crate::domain::result::FetchError;
use crate::domain::{normalize_categories, MenuCategory};
use crate::ports::BackendApi;
use crate::services::logging::{events, record, LogEvent, LoggingService};

struct CacheEntry {
    data: Vec<JsonValue>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

pub struct MenuService {
    backend: Arc<dyn BackendApi>,
    ttl: Duration,
    cache: Mutex<Option<CacheEntry>>,
    logger: Option<Arc<LoggingService>>,
}

impl MenuService {
    pub fn new(backend: Arc<dyn BackendApi>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            cache: Mutex::new(None),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Raw categories, from the cache while it is fresh. Failures are
    /// logged and returned, and never cached.
    pub fn try_fetch_menu_data(&self) -> Result<Vec<JsonValue>, FetchError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cache.as_ref().filter(|entry| entry.is_fresh(self.ttl)) {
            return Ok(entry.data.clone());
        }

        let data = match self.backend.get_menu() {
            Ok(payload) => payload_to_raw_categories(payload),
            Err(e) => {
                record(
                    self.logger.as_deref(),
                    LogEvent::new(events::MENU_FETCH_FAILED)
                        .with_endpoint(MENU_PATH)
                        .with_error(e.to_string())
                        .with_error_details(e.kind()),
                );
                return Err(e);
            }
        };

        *cache = Some(CacheEntry {
            data: data.clone(),
            fetched_at: Instant::now(),
        });
        record(
            self.logger.as_deref(),
            LogEvent::new(events::MENU_FETCHED).with_endpoint(MENU_PATH),
        );
        Ok(data)
    }

    /// Raw categories; empty when the menu could not be fetched
    pub fn fetch_menu_data(&self) -> Vec<JsonValue> {
        self.try_fetch_menu_data().unwrap_or_default()
    }

    /// Normalized categories; empty when the menu could not be fetched
    pub fn get_menu_categories(&self) -> Vec<MenuCategory> {
        normalize_categories(&self.fetch_menu_data())
    }

    /// Age of the cached menu, if one is still fresh
    pub fn cache_age(&self) -> Option<Duration> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.fetched_at.elapsed())
    }

    /// Drop the cached menu so the next call refetches
    pub fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
