//! Error types for the workspace client

use std::path::PathBuf;
use std::time::Duration;

use dbx_core::promotion::PromotionError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error code the platform uses for missing workspace objects
pub const RESOURCE_DOES_NOT_EXIST: &str = "RESOURCE_DOES_NOT_EXIST";

/// Errors that can occur when using the workspace client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}{}): {message}", .error_code.as_deref().map(|c| format!(", {c}")).unwrap_or_default())]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Platform error code, e.g. `RESOURCE_DOES_NOT_EXIST`
        error_code: Option<String>,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local file access failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run did not reach a terminal state in time
    #[error("Run {run_id} still not finished after {waited:?}")]
    Timeout { run_id: i64, waited: Duration },

    /// Registry state does not allow a promotion
    #[error(transparent)]
    Promotion(#[from] PromotionError),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, error_code: Option<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            error_code,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is a "not found" error
    ///
    /// The workspace API reports missing objects either with a 404 or with a
    /// 400 carrying `RESOURCE_DOES_NOT_EXIST`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ApiError { status, error_code, .. }
                if *status == 404 || error_code.as_deref() == Some(RESOURCE_DOES_NOT_EXIST)
        )
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_by_status_or_code() {
        assert!(ClientError::api_error(404, None, "gone").is_not_found());
        assert!(
            ClientError::api_error(400, Some(RESOURCE_DOES_NOT_EXIST.to_string()), "gone")
                .is_not_found()
        );
        assert!(!ClientError::api_error(400, None, "bad").is_not_found());
        assert!(!ClientError::ParseError("not json".into()).is_not_found());
    }

    #[test]
    fn test_status_classes() {
        let err = ClientError::api_error(403, None, "denied");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = ClientError::api_error(503, None, "unavailable");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(400, Some("INVALID_PARAMETER_VALUE".into()), "bad path");
        assert_eq!(
            err.to_string(),
            "API error (status 400, INVALID_PARAMETER_VALUE): bad path"
        );
        let err = ClientError::api_error(500, None, "boom");
        assert_eq!(err.to_string(), "API error (status 500): boom");
    }
}
