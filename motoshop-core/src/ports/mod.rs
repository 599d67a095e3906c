//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod store;

pub use store::{read_json, try_read_json, write_json, KeyValueStore, StorageKey};
