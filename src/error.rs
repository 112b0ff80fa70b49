//! Error types for the QRZ client library.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, QrzError>;

/// Comprehensive error type for all QRZ operations
#[derive(Error, Debug)]
pub enum QrzError {
    /// Network or HTTP-related errors (connection failure, timeout, non-2xx status)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// XML parsing errors
    #[error("XML parsing error: {0}")]
    Parse(#[from] quick_xml::DeError),

    /// JSON serialization errors (from `to_json`)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication failed or session could not be recovered
    #[error("Authentication failed: {reason}")]
    Auth { reason: String },

    /// Session expired or was rejected by the server - re-authentication required
    #[error("Session expired or invalid - re-authentication required")]
    SessionExpired,

    /// Callsign not found. This is the expected "empty result" signal, not a bug.
    #[error("Callsign not found: {callsign}")]
    NotFound { callsign: String },

    /// Any other service-reported failure (rate limiting, subscription limits, ...)
    #[error("QRZ service error: {message}")]
    Service { message: String },

    /// Invalid input provided by the caller
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl QrzError {
    /// Create a new authentication error
    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }

    /// Create a new callsign not found error
    pub fn not_found(callsign: impl Into<String>) -> Self {
        Self::NotFound {
            callsign: callsign.into(),
        }
    }

    /// Create a new service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Check if this error indicates we should retry with a fresh session
    pub fn should_reauthenticate(&self) -> bool {
        matches!(self, QrzError::SessionExpired)
    }

    /// Check if this error is the expected empty-result signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, QrzError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = QrzError::service("test message");
        assert!(error.to_string().contains("test message"));

        let error = QrzError::not_found("TEST");
        assert!(error.to_string().contains("TEST"));
    }

    #[test]
    fn test_error_properties() {
        assert!(QrzError::SessionExpired.should_reauthenticate());
        assert!(!QrzError::auth("bad password").should_reauthenticate());

        assert!(QrzError::not_found("TEST").is_not_found());
        assert!(!QrzError::service("limit reached").is_not_found());
    }
}
