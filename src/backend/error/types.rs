/**
 * Backend Error Types
 *
 * Errors raised by the note store gateway and the server lifecycle.
 *
 * # Error Categories
 *
 * ## Store Errors
 *
 * - `StoreUnavailable` - the store could not be reached (pool closed,
 *   connection refused, timeouts)
 * - `QueryFailed` - the store answered but the statement failed
 * - `ValidationFailed` - the collection schema rejected the fields
 * - `NotFound` - an update targeted an id that does not exist
 *
 * ## Startup Errors
 *
 * - `Config` - invalid configuration
 * - `Io` - binding or serving the listener failed
 */

use thiserror::Error;

use crate::shared::{ConfigError, NoteId};

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store connection or driver failed
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Human-readable error message
        message: String,
    },

    /// A store query failed
    #[error("Query failed: {message}")]
    QueryFailed {
        /// Human-readable error message
        message: String,
    },

    /// The collection schema rejected the supplied fields
    #[error("Validation failed for field '{field}': {message}")]
    ValidationFailed {
        /// Offending field
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// No note with this id exists
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Listener I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Create a store-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a query-failed error
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}
