use thiserror::Error;

use crate::domain::error::TransportError;

/// Errors raised by team backends
#[derive(Debug, Error)]
pub enum TeamError {
    /// The login exchange was rejected. No identity is ever produced
    /// alongside this error.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Content-Type of {url} is not application/json but {content_type}")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TeamError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    pub fn unexpected_content_type(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::UnexpectedContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
