//! Fishtail Core - client-side menu and access-control layer
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Menu, filter, session, navigation and layout types and rules
//! - **ports**: Trait definitions for the outside world (BackendApi, KeyValueStore, Navigator)
//! - **services**: Menu cache and auth/session orchestration, event logging
//! - **adapters**: Concrete implementations (reqwest, JSON file storage, etc.)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{HttpBackend, JsonFileStore};
use config::Config;
use ports::{BackendApi, KeyValueStore, Navigator};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, FetchError, OperationResult};
pub use services::{EntryPoint, LogEvent, LoggingService};
pub use domain::{
    GuardState, LayoutKind, MenuCategory, MenuItem, NavSection, QueryParams, Role, RouteGuard,
    RouteKind, SessionState, User,
};

/// Main context for Fishtail operations
///
/// Owns the configuration, the adapters and every service. Services are
/// created once per context, so the menu cache and the session live exactly
/// as long as the context does.
pub struct FishtailContext {
    pub config: Config,
    pub backend: Arc<dyn BackendApi>,
    pub store: Arc<dyn KeyValueStore>,
    pub navigator: Arc<dyn Navigator>,
    pub logger: Option<Arc<LoggingService>>,
    pub menu_service: MenuService,
    pub auth_service: AuthService,
    pub query_provider: domain::QueryProvider,
}

impl FishtailContext {
    /// Create a context backed by the app directory: settings.json for
    /// configuration, storage.json for local storage, and the HTTP backend.
    pub fn new(app_dir: &Path, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let config = Config::load(app_dir)?;
        let backend: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(&config.api_base())?);
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(app_dir));
        Ok(Self::with_parts(config, backend, store, navigator, None))
    }

    /// Assemble a context from explicit parts (embedders and tests)
    pub fn with_parts(
        config: Config,
        backend: Arc<dyn BackendApi>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let mut menu_service = MenuService::new(Arc::clone(&backend), config.menu_cache_ttl());
        let mut auth_service = AuthService::new(
            Arc::clone(&backend),
            Arc::clone(&store),
            Arc::clone(&navigator),
            config.auth_base(),
        );
        if let Some(logger) = &logger {
            menu_service = menu_service.with_logger(Arc::clone(logger));
            auth_service = auth_service.with_logger(Arc::clone(logger));
        }

        Self {
            config,
            backend,
            store,
            navigator,
            logger,
            menu_service,
            auth_service,
            query_provider: domain::QueryProvider::new(),
        }
    }

    /// Attach an event logger to every service
    pub fn with_logger(self, logger: Arc<LoggingService>) -> Self {
        Self::with_parts(self.config, self.backend, self.store, self.navigator, Some(logger))
    }

    /// Query parameters of the navigator's current location
    pub fn query(&self) -> QueryParams {
        self.query_provider.query(&self.navigator.current_href())
    }

    /// Initialize the session from the current location
    pub fn initialize_session(&self) -> SessionState {
        self.auth_service.initialize(&self.query())
    }
}
