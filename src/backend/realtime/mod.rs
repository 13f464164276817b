//! Real-time Update Module
//!
//! Keeps every connected client in step with the note collection.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── broadcast.rs - Snapshot broadcast channel
//! ├── hub.rs       - Per-connection event wiring
//! └── socket.rs    - WebSocket transport
//! ```
//!
//! # Event Flow
//!
//! ```text
//! client --createNote--> hub --create--> gateway --insert--> store
//!                         |
//!                         +--list--> gateway, then "notes" to every client
//! ```
//!
//! Every mutation re-broadcasts the full snapshot. Clients treat the most
//! recent `notes` event as authoritative and discard older ones.

/// Snapshot broadcasting utilities
pub mod broadcast;

/// Connection wiring
pub mod hub;

/// WebSocket handler
pub mod socket;

// Re-export commonly used types and functions
pub use broadcast::{broadcast_event, SnapshotBroadcast};
pub use hub::{ClientHandle, HubConnection, SyncHub};
pub use socket::websocket_handler;
