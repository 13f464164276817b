//! Backend Error Module
//!
//! Error types for the note store gateway and the server lifecycle.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Conversions from driver errors
//! ```
//!
//! The hub never forwards these errors to clients verbatim. Failures are
//! logged and the originating socket receives a fixed `error` event payload.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;

/// Result alias used across the backend
pub type BackendResult<T> = Result<T, BackendError>;
