//! Typed access to the Sahayak business backend.
//!
//! Requests are built by the pure functions in [`requests`] and dispatched
//! with [`ApiClient::fetch_json`]. Profile-aware calls take a [`Session`]
//! by reference and read the active profile id from it at call time.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod requests;
pub mod session;

pub use client::ApiClient;
pub use config::{ApiClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorBody, Result};
pub use request::{scoped, ApiRequest, ScopedPayload};
pub use session::{FileStore, MemoryStore, Session, SessionStore, PROFILE_ID_KEY};
