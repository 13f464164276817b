//! Server Module
//!
//! Server initialization, application state and store loading.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Store loading from configuration
//! └── init.rs   - NoteServer lifecycle
//! ```

/// Application state management
pub mod state;

/// Store loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::{create_app, shutdown_signal, NoteServer};
pub use state::AppState;
