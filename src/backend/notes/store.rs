/**
 * Note Store Trait
 *
 * The seam between the gateway and the document store. Implementations own
 * their connection handling and schema enforcement; callers only see the four
 * collection operations plus `close`.
 */

use async_trait::async_trait;

use crate::backend::error::BackendResult;
use crate::shared::{Fields, Note, NoteId};

/// Asynchronous access to the note collection
#[async_trait]
pub trait NoteStore: Send + Sync + 'static {
    /// Short name for logs
    fn backend_name(&self) -> &'static str;

    /// Every note in the collection
    async fn list(&self) -> BackendResult<Vec<Note>>;

    /// Persist a new note; the store assigns its id
    async fn insert(&self, fields: Fields) -> BackendResult<Note>;

    /// Atomically merge `patch` into an existing note.
    ///
    /// Fails with `NotFound` when no note has this id.
    async fn merge(&self, id: NoteId, patch: Fields) -> BackendResult<Note>;

    /// Remove a note, returning it if it existed
    async fn remove(&self, id: NoteId) -> BackendResult<Option<Note>>;

    /// Release the connection; later calls fail with `StoreUnavailable`
    async fn close(&self);
}
