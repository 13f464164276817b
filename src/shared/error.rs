//! Shared Error Types
//!
//! Errors that can occur on both sides of the socket: decoding frames and
//! serializing payloads.
//!
//! # Usage
//!
//! ```rust
//! use notehub::shared::error::SharedError;
//!
//! let error = SharedError::protocol("frame is not a JSON array");
//! assert!(error.to_string().starts_with("Protocol error"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both clients and the server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Socket frame that does not match the event contract
    #[error("Protocol error: {message}")]
    ProtocolError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
