/**
 * Note Store Gateway
 *
 * Translates the four logical note operations into store calls and shapes the
 * results the way the hub needs them. The gateway keeps no state of its own:
 * every call round-trips to the store, so a snapshot taken after a write
 * always reflects it.
 *
 * There is no ordering or locking between concurrent calls. Two updates to
 * the same note race in the store and the last one to commit wins.
 */

use std::sync::Arc;

use crate::backend::error::BackendResult;
use crate::backend::notes::store::NoteStore;
use crate::shared::{Fields, Note, NoteId, Snapshot};

/// Cloneable handle over a shared note store
#[derive(Clone)]
pub struct NoteGateway {
    store: Arc<dyn NoteStore>,
}

impl std::fmt::Debug for NoteGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteGateway")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl NoteGateway {
    /// Create a gateway over `store`
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor taking the store by value
    pub fn from_store<S: NoteStore>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// Every note in the collection, keyed by id
    pub async fn list(&self) -> BackendResult<Snapshot> {
        let notes = self.store.list().await?;
        tracing::debug!("[Notes] Listed {} notes", notes.len());
        Ok(notes.into_iter().collect())
    }

    /// Create a note; the returned record carries the new id
    pub async fn create(&self, fields: Fields) -> BackendResult<Note> {
        let note = self.store.insert(fields).await?;
        tracing::debug!("[Notes] Created note {}", note.id);
        Ok(note)
    }

    /// Merge `fields` into the note with this id, leaving other fields intact
    pub async fn update(&self, id: NoteId, fields: Fields) -> BackendResult<Note> {
        let note = self.store.merge(id, fields).await?;
        tracing::debug!("[Notes] Updated note {}", note.id);
        Ok(note)
    }

    /// Delete a note.
    ///
    /// Returns the removed note, or `None` if it was already gone. Both are
    /// successful outcomes.
    pub async fn delete(&self, id: NoteId) -> BackendResult<Option<Note>> {
        let removed = self.store.remove(id).await?;
        match &removed {
            Some(_) => tracing::debug!("[Notes] Deleted note {}", id),
            None => tracing::debug!("[Notes] Delete of {} found nothing", id),
        }
        Ok(removed)
    }

    /// Close the underlying store
    pub async fn close(&self) {
        self.store.close().await;
    }

    /// Backend name for logs
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
