//! NoteHub - Main Library
//!
//! NoteHub is a small real-time note-sharing backend. Clients hold a
//! persistent WebSocket to the server, receive the full set of notes when they
//! connect, and send create/update/delete events. Every successful mutation is
//! persisted to the note store and the fresh snapshot is pushed to every
//! connected client.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between clients and the server
//!   - Note model (`Note`, `NoteId`, `Fields`, `Snapshot`)
//!   - Socket event contract (`ClientEvent`, `ServerEvent`)
//!   - Configuration and shared error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Note store gateway with PostgreSQL and in-memory backends
//!   - Realtime sync hub and WebSocket handler
//!   - Router, middleware and server lifecycle
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the
//!   `notehub-server` binary.
//!
//! # Usage
//!
//! ```rust,no_run
//! use notehub::backend::server::NoteServer;
//! use notehub::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), notehub::backend::BackendError> {
//! let config = ServerConfig::from_env()?;
//! let server = NoteServer::bind(config).await?;
//! server.serve_with_shutdown(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The store handle, gateway and hub are cheap to clone and `Send + Sync`
//! - Snapshots fan out through a `tokio::sync::broadcast` channel
//! - Each socket gets its own bounded `mpsc` outbox

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
