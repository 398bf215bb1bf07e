//! Typed network failures surfaced to loader state

use thiserror::Error;

/// Network error taxonomy shared by the client and the loaders.
///
/// Kept `Clone + PartialEq` so it can sit inside observable state snapshots;
/// transport errors are captured as messages for that reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Invalid response (HTTP {0})")]
    InvalidResponse(u16),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl NetworkError {
    /// Recover a typed error from an `anyhow` chain, if one is present
    pub fn find(err: &anyhow::Error) -> Option<NetworkError> {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<NetworkError>())
            .cloned()
    }

    /// Typed error, or `Unknown` carrying the original message
    pub fn classify(err: anyhow::Error) -> NetworkError {
        Self::find(&err).unwrap_or_else(|| NetworkError::Unknown(format!("{:#}", err)))
    }

    /// Whether the error came from the transport rather than the server
    pub fn is_transport(&self) -> bool {
        matches!(self, NetworkError::RequestFailed(_))
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NetworkError::DecodingError(err.to_string())
        } else {
            NetworkError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::DecodingError(err.to_string())
    }
}
