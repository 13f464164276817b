//! Common test utilities and helpers
#![allow(dead_code)]

use std::time::Duration;

use notehub::backend::notes::{MemoryNoteStore, NoteGateway, NoteSchema};
use notehub::backend::realtime::{HubConnection, SyncHub};
use notehub::shared::{FieldValue, Fields, Note, ServerEvent, Snapshot};
use tokio::time::timeout;

/// How long a test waits for an event before failing
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Hub over a fresh in-memory store with the default schema
pub fn memory_hub() -> SyncHub {
    memory_hub_with(NoteSchema::default())
}

/// Hub over a fresh in-memory store with a custom schema
pub fn memory_hub_with(schema: NoteSchema) -> SyncHub {
    SyncHub::new(NoteGateway::from_store(MemoryNoteStore::new(schema)), 64)
}

/// Build a field map from string pairs
pub fn text_fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
        .collect()
}

/// Wait for the next event on a connection
pub async fn next_event(conn: &mut HubConnection) -> ServerEvent {
    match timeout(EVENT_TIMEOUT, conn.recv()).await {
        Ok(Some(event)) => event,
        Ok(None) => panic!("connection closed while waiting for an event"),
        Err(_) => panic!("timed out waiting for an event"),
    }
}

/// Wait for the next event and require it to be a snapshot
pub async fn next_notes(conn: &mut HubConnection) -> Snapshot {
    match next_event(conn).await {
        ServerEvent::Notes(snapshot) => snapshot,
        other => panic!("Expected notes event, got {:?}", other),
    }
}

/// Assert that nothing arrives on a connection for a short while
pub async fn assert_quiet(conn: &mut HubConnection) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    if let Some(event) = conn.try_recv() {
        panic!("Expected no event, got {:?}", event);
    }
}

/// The only note in a snapshot
pub fn single_note(snapshot: &Snapshot) -> &Note {
    assert_eq!(snapshot.len(), 1, "expected exactly one note: {:?}", snapshot);
    snapshot.notes().next().unwrap()
}
