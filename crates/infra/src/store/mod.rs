//! Durable key-value storage boundary.
//!
//! The engine persists one serialized snapshot under one fixed key; backends
//! only need whole-value load/save/remove semantics.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use r#trait::{DurableStore, StoreError};
pub use sqlite::{SqliteStore, default_store_path};
