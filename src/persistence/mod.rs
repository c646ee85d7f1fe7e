//! Persistence module
//!
//! Key-value storage backends and the adapter that keeps the timer record in them.

pub mod adapter;
pub mod store;

// Re-export main types
pub use adapter::{StatePersistence, STATE_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
