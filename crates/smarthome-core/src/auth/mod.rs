//! Session management: the persisted access/refresh token pair.
//!
//! This module provides:
//! - `TokenStore`: get/set/clear of the credential pair, plus the
//!   `is_authenticated` predicate route guards consult
//! - `TokenStorage`: the key/value backend seam, with in-memory, JSON file
//!   and OS keychain implementations
//!
//! The store is an explicit context object. Build one, wrap it in an `Arc`
//! and hand it to every `ApiClient` that should share the session.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, KeyringStorage, MemoryStorage, TokenStorage};
pub use store::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
