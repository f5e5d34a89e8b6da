//! REST API client module for the smart-home backend.
//!
//! `ApiClient` is the authenticated request gateway: it attaches the stored
//! access token as a bearer credential and recovers once from a 401 by
//! exchanging the refresh token. The endpoint wrappers in `session`,
//! `devices` and `account` are thin typed calls through that gateway.

pub mod account;
pub mod client;
pub mod devices;
pub mod error;
pub mod session;

pub use client::{ApiClient, PendingRequest, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
