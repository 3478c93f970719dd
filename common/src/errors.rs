// Error handling framework

use thiserror::Error;

/// Errors from the platform REST API.
///
/// The server reports rejections as a JSON body with an `error` field;
/// anything else (connection failures, timeouts, bodyless status codes) is a
/// transport-level failure. The variants are tagged so callers can branch
/// exhaustively instead of probing response shapes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    ServerRejected { message: String },

    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Message suitable for a user-facing alert: the server-supplied error
    /// when present, otherwise the transport-level description.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::ServerRejected { message } => message,
            ApiError::Transport { message, .. } => message,
            ApiError::InvalidResponse(message) => message,
        }
    }
}

/// Session store errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to initialize session directory '{path}': {source}")]
    Init {
        path: String,
        source: std::io::Error,
    },

    #[error("session storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to clear session store: {0}")]
    Clear(std::io::Error),

    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejected_message_is_passed_through() {
        let error = ApiError::ServerRejected {
            message: "Invalid cron".to_string(),
        };
        assert_eq!(error.user_message(), "Invalid cron");
        assert_eq!(error.to_string(), "Invalid cron");
    }

    #[test]
    fn transport_message_is_user_facing() {
        let error = ApiError::Transport {
            status: Some(503),
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(error.user_message(), "Service Unavailable");
    }
}
