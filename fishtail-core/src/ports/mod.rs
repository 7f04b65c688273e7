//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod backend;
mod navigator;
mod store;

pub use backend::BackendApi;
pub use navigator::Navigator;
pub use store::KeyValueStore;
