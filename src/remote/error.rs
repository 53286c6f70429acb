//! API error taxonomy
//!
//! Three failure classes reach the user: a server reply with an error
//! status, no reply at all, and a locally failed request. Validation
//! no-ops (empty or unchanged input) are handled before any request is
//! built and never produce an error.

use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure talking to the Hae server
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server responded with an error status
    #[error("server error ({status}): {detail}")]
    Server { status: StatusCode, detail: String },

    /// No response was received (connect failure, timeout, ...)
    #[error("no response received from server: {0}")]
    Transport(String),

    /// The request could not be constructed or its response decoded
    #[error("request failed locally: {0}")]
    Local(String),
}

impl ApiError {
    /// User-facing alert text, matching the notice wording the client
    /// shows for each failure class. `doing` is a gerund phrase like
    /// "saving information".
    pub fn alert(&self, doing: &str) -> String {
        match self {
            ApiError::Server { detail, .. } => format!("Error {}: {}", doing, detail),
            ApiError::Transport(_) => "No response received from server".to_string(),
            ApiError::Local(msg) => format!("Error: {}", msg),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Local(err.to_string())
        } else if err.is_decode() {
            ApiError::Local(format!("invalid response body: {}", err))
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Local(format!("invalid endpoint path: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_alert_includes_detail() {
        let err = ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Failed to save content".to_string(),
        };
        assert_eq!(
            err.alert("saving information"),
            "Error saving information: Failed to save content"
        );
    }

    #[test]
    fn test_transport_alert_is_generic() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.alert("saving information"), "No response received from server");
    }

    #[test]
    fn test_local_alert_carries_raw_message() {
        let err = ApiError::Local("bad url".to_string());
        assert_eq!(err.alert("anything"), "Error: bad url");
    }
}
