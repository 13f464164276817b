//! Backend Module
//!
//! All server-side code. Only compiled when the `ssr` feature is enabled.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs      - Module exports and documentation
//! ├── main.rs     - notehub-server binary
//! ├── error/      - Backend error taxonomy
//! ├── notes/      - Note store gateway and store backends
//! ├── realtime/   - Sync hub, snapshot broadcast, WebSocket handler
//! ├── routes/     - Router and middleware
//! └── server/     - State, store loading, lifecycle
//! ```
//!
//! # Thread Safety
//!
//! - The store sits behind `Arc<dyn NoteStore>`; the PostgreSQL pool and the
//!   in-memory map are both safe to share
//! - Snapshots fan out through `broadcast::Sender`
//! - Axum handlers are `Send + Sync`

/// Backend error types
pub mod error;

/// Note store gateway and backends
pub mod notes;

/// Real-time update system
pub mod realtime;

/// Route configuration
pub mod routes;

/// Server setup and lifecycle
pub mod server;

/// Re-export commonly used types
pub use error::{BackendError, BackendResult};
pub use notes::{NoteGateway, NoteStore};
pub use realtime::SyncHub;
pub use server::NoteServer;
