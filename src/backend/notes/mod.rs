//! Note Store Module
//!
//! Everything between the hub and the document store.
//!
//! # Module Structure
//!
//! ```text
//! notes/
//! ├── mod.rs      - Module exports and store selection
//! ├── gateway.rs  - list / create / update / delete
//! ├── store.rs    - NoteStore trait
//! ├── schema.rs   - Collection schema enforced on writes
//! ├── db.rs       - PostgreSQL store (sqlx)
//! └── memory.rs   - In-process store
//! ```

/// Gateway over the note store
pub mod gateway;

/// Store trait
pub mod store;

/// Collection schema
pub mod schema;

/// PostgreSQL store
pub mod db;

/// In-memory store
pub mod memory;

use std::sync::Arc;

pub use db::PgNoteStore;
pub use gateway::NoteGateway;
pub use memory::MemoryNoteStore;
pub use schema::{FieldKind, NoteSchema};
pub use store::NoteStore;

use crate::backend::error::BackendResult;
use crate::shared::ServerConfig;

/// Open the store named by the configured connection string.
///
/// `memory://` selects the in-process store; anything else is handed to the
/// PostgreSQL driver.
pub async fn open_store(config: &ServerConfig, schema: NoteSchema) -> BackendResult<Arc<dyn NoteStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory note store; notes are lost on restart");
        return Ok(Arc::new(MemoryNoteStore::new(schema)));
    }
    Ok(Arc::new(PgNoteStore::connect(&config.database_url, schema).await?))
}
