//! feedview Network - snapshot retrieval over HTTPS
//!
//! One authenticated GET against the configured endpoint returns the
//! whole snapshot. No pagination, no retry; the caller decides when to
//! fetch again.

pub mod client;

pub use client::{SnapshotClient, SnapshotSource};

use thiserror::Error;

/// Failure to construct a client. Fetch-time failures are
/// [`feedview_protocol::FetchError`].
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Invalid endpoint '{0}': {1}")]
    InvalidEndpoint(String, String),

    #[error("HTTP client error: {0}")]
    Client(String),
}
