//! Error types for bridge and adapter operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the Content Network through the
/// host bridge.
///
/// Expected absence (not-found, empty search) is never an error: read
/// operations return `Option`/empty `Vec` for those cases.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The host did not inject a bridge; the app is running standalone.
    /// Reads degrade to mock data, writes surface this error.
    #[error("Content Network bridge not available - run inside the host UI to publish")]
    BridgeUnavailable,

    /// The bridge did not answer within the configured deadline. The
    /// bridge itself has no timeout, so the adapter imposes one.
    #[error("bridge request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure reported by the bridge.
    #[error("bridge transport failure: {0}")]
    Transport(String),

    /// A write was answered with a well-formed rejection payload. Carries
    /// the raw payload so callers can surface the underlying message.
    #[error("publish rejected by the network: {0}")]
    Rejected(serde_json::Value),

    /// Response payload is missing expected fields.
    #[error("malformed bridge response: {0}")]
    Malformed(String),

    /// Validation or other domain error raised before any network call.
    #[error(transparent)]
    Core(#[from] qmusic_core::QMusicError),
}

impl NetworkError {
    /// Whether retrying the same request is sensible (transport-class
    /// failures), as opposed to validation or rejection errors.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}

/// Result type for bridge and adapter operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_classification() {
        assert!(NetworkError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(NetworkError::Transport("reset".into()).is_retryable());
        assert!(!NetworkError::BridgeUnavailable.is_retryable());
        assert!(!NetworkError::Rejected(serde_json::json!({"error": "no"})).is_retryable());
        assert!(!NetworkError::Malformed("missing songs".into()).is_retryable());
    }
}
