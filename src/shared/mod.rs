//! Shared Module
//!
//! This module contains types that are shared between socket clients and the
//! server. Everything here is serializable and free of server dependencies, so
//! a client crate can depend on `notehub` with `default-features = false`.

/// Note data model
pub mod note;

/// Socket event contract
pub mod event;

/// Shared error types
pub mod error;

/// Server configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use note::{FieldValue, Fields, Note, NoteId, Snapshot};
pub use event::{ClientEvent, ServerEvent};
pub use error::SharedError;
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
