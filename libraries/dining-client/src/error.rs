//! Error types for the Custom Dining client.

use dining_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the Custom Dining API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// No session token available; the login redirect has been triggered
    #[error("Authentication required")]
    AuthRequired,

    /// The server rejected the token (HTTP 401); the session has been
    /// cleared and the login redirect triggered
    #[error("Session expired")]
    SessionExpired,

    /// Login failed (invalid credentials or unusable token)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Server returned a non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed or had an unexpected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Request rejected before it was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persistent session storage failed
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Whether this error means the user has to sign in again.
    ///
    /// Both variants have already cleared state and triggered the login
    /// redirect, so callers should not surface them as failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::AuthRequired | ClientError::SessionExpired)
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::AuthFailed(message) | ClientError::InvalidInput(message) => {
                message.clone()
            }
            ClientError::MalformedResponse(_) => "Invalid response from server".to_string(),
            ClientError::ServerUnreachable(_) | ClientError::Request(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(msg) => ClientError::InvalidInput(msg),
            CoreError::Serialization(e) => ClientError::MalformedResponse(e.to_string()),
        }
    }
}

/// Errors from the persistent session store.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the session file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The session document could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
