//! In-process note store.
//!
//! Selected with a `memory://` connection string. State lives for the life of
//! the process and is shared between clones.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::notes::schema::NoteSchema;
use crate::backend::notes::store::NoteStore;
use crate::shared::{Fields, Note, NoteId};

/// Note store backed by a map behind an async lock
#[derive(Debug, Clone)]
pub struct MemoryNoteStore {
    notes: Arc<RwLock<BTreeMap<NoteId, Note>>>,
    schema: Arc<NoteSchema>,
    closed: Arc<AtomicBool>,
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new(NoteSchema::default())
    }
}

impl MemoryNoteStore {
    /// Create an empty store enforcing `schema`
    pub fn new(schema: NoteSchema) -> Self {
        Self {
            notes: Arc::new(RwLock::new(BTreeMap::new())),
            schema: Arc::new(schema),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of stored notes
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    /// Whether the store holds no notes
    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }

    fn ensure_open(&self) -> BackendResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackendError::unavailable("memory store is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> BackendResult<Vec<Note>> {
        self.ensure_open()?;
        Ok(self.notes.read().await.values().cloned().collect())
    }

    async fn insert(&self, fields: Fields) -> BackendResult<Note> {
        self.ensure_open()?;
        self.schema.validate_new(&fields)?;

        let mut notes = self.notes.write().await;
        let mut id = NoteId::new();
        while notes.contains_key(&id) {
            id = NoteId::new();
        }
        let note = Note::new(id, fields);
        notes.insert(id, note.clone());
        Ok(note)
    }

    async fn merge(&self, id: NoteId, patch: Fields) -> BackendResult<Note> {
        self.ensure_open()?;
        self.schema.validate_patch(&patch)?;

        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(BackendError::NotFound(id))?;
        note.merge(patch);
        Ok(note.clone())
    }

    async fn remove(&self, id: NoteId) -> BackendResult<Option<Note>> {
        self.ensure_open()?;
        Ok(self.notes.write().await.remove(&id))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
