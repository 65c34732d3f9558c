//! Persistent local storage
//!
//! A tiny key → string store (the CLI's stand-in for browser local storage)
//! and whole-list JSON stores for policies and claims on top of it.

pub mod list;
pub mod storage;

pub use list::{ClaimStore, JsonListStore, PolicyStore, CLAIMS_KEY, POLICIES_KEY};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
