//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! owns the state for its feature area.

mod auth;
pub mod logging;
mod menu;

pub use auth::{AuthService, AuthUrls, POST_LOGIN_ROUTE};
pub use logging::{events, EntryPoint, LogEntry, LogEvent, LoggingService};
pub use menu::MenuService;
