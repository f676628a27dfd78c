//! Persistence: the key-value collaborator and the ability store

pub mod abilities;
pub mod kv;

pub use abilities::{AbilityStore, ABILITIES_KEY, API_KEY_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
