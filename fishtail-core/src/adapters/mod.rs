//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - `reqwest` blocking client for BackendApi
//! - JSON file (or memory) for KeyValueStore
//! - Recording navigator for Navigator

pub mod file_store;
pub mod http;
pub mod memory_store;
pub mod navigator;

pub use file_store::JsonFileStore;
pub use http::HttpBackend;
pub use memory_store::MemoryStore;
pub use navigator::RecordingNavigator;
