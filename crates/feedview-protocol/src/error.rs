use thiserror::Error;

/// Failure to obtain a snapshot from the backend.
///
/// The `Display` form is the single message surfaced to the operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Http(u16),

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}
