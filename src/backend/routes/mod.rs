//! Route Configuration Module
//!
//! The HTTP surface is a health check and the socket endpoint. All note
//! traffic travels over the socket.

/// Main router creation
pub mod router;

// Re-export commonly used functions
pub use router::{create_router, GREETING};
