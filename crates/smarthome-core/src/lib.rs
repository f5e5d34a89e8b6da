//! Core library for smarthome.
//!
//! Talks to the mock smart-home backend on behalf of a signed-in user:
//!
//! - [`auth`]: the persisted access/refresh token pair
//! - [`api`]: the authenticated request gateway and typed endpoint calls
//! - [`models`]: JSON payload types
//! - [`config`]: backend URL, timeout and token storage selection
//!
//! ```no_run
//! use std::sync::Arc;
//! use smarthome_core::{ApiClient, Credentials, TokenStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let tokens = Arc::new(TokenStore::in_memory());
//! let api = ApiClient::new("http://127.0.0.1:5000", tokens)?;
//! api.login(&Credentials::new("alice", "secret")).await?;
//! for device in api.list_devices().await? {
//!     println!("{} is {}", device.name, device.status.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, PendingRequest};
pub use auth::TokenStore;
pub use config::Config;
pub use models::Credentials;
