/**
 * Realtime Sync Hub
 *
 * The hub wires sockets to the note gateway:
 *
 * 1. On connect, the socket gets the current snapshot as a `notes` event
 *    before anything else.
 * 2. Each `createNote` / `updateNote` / `deleteNote` event is queued on the
 *    connection's dispatch task, which runs the matching gateway operations
 *    one at a time in arrival order. Connections dispatch independently.
 * 3. After a successful mutation the snapshot is re-read and broadcast to
 *    every socket.
 * 4. A failed mutation is logged and answered with an `error` event to the
 *    originating socket only. Nothing is broadcast.
 *
 * The hub is transport agnostic. Each connection is a pair of a
 * [`ClientHandle`] that accepts inbound events and an outbox receiver that
 * yields the events to write back. The WebSocket handler only moves frames
 * between the socket and that pair.
 */

use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::backend::notes::NoteGateway;
use crate::backend::realtime::broadcast::{broadcast_event, snapshot_channel, SnapshotBroadcast};
use crate::shared::event::messages;
use crate::shared::{ClientEvent, ServerEvent};

/// Pending events buffered per socket before writes apply backpressure
const OUTBOX_CAPACITY: usize = 64;

/// Inbound events queued per socket before reads apply backpressure
const INBOX_CAPACITY: usize = 64;

/// Shared hub state; cheap to clone
#[derive(Debug, Clone)]
pub struct SyncHub {
    gateway: NoteGateway,
    broadcast: SnapshotBroadcast,
}

impl SyncHub {
    /// Create a hub over `gateway` with a broadcast buffer of `capacity` events
    pub fn new(gateway: NoteGateway, capacity: usize) -> Self {
        Self {
            gateway,
            broadcast: snapshot_channel(capacity),
        }
    }

    /// The note gateway
    pub fn gateway(&self) -> &NoteGateway {
        &self.gateway
    }

    /// Number of sockets currently subscribed to broadcasts
    pub fn client_count(&self) -> usize {
        self.broadcast.receiver_count()
    }

    /// Accept a new connection.
    ///
    /// The connection's outbox starts with the current snapshot (or a
    /// `fetch failed` error), followed by every broadcast sent after this
    /// call began.
    pub async fn connect(&self) -> HubConnection {
        let id = Uuid::new_v4();
        let (outbox, events) = mpsc::channel(OUTBOX_CAPACITY);

        // subscribe first so no broadcast between the read and the forwarder is lost
        let updates = self.broadcast.subscribe();

        let initial = match self.gateway.list().await {
            Ok(snapshot) => {
                tracing::debug!("[Hub] Sending {} notes to client {}", snapshot.len(), id);
                ServerEvent::Notes(snapshot)
            }
            Err(e) => {
                tracing::error!("[Hub] Failed to load notes for client {}: {}", id, e);
                ServerEvent::error(messages::FETCH_FAILED)
            }
        };
        // the receiver is still held here, so this cannot fail
        let _ = outbox.send(initial).await;

        tokio::spawn(forward_broadcasts(id, updates, outbox.clone()));

        let dispatcher = Dispatcher {
            id,
            hub: self.clone(),
            outbox,
        };
        let (inbox, queued) = mpsc::channel(INBOX_CAPACITY);
        tokio::spawn(run_dispatcher(dispatcher.clone(), queued));

        tracing::info!("[Hub] Client {} connected ({} total)", id, self.client_count());

        HubConnection {
            handle: ClientHandle { dispatcher, inbox },
            events,
        }
    }

    /// Re-read the snapshot and broadcast it to every socket.
    ///
    /// Returns the number of sockets reached. A failed read is logged and
    /// nothing is sent.
    pub async fn push_notes(&self) -> usize {
        match self.gateway.list().await {
            Ok(snapshot) => broadcast_event(&self.broadcast, ServerEvent::Notes(snapshot)),
            Err(e) => {
                tracing::error!("[Hub] Failed to reload notes for broadcast: {}", e);
                0
            }
        }
    }
}

async fn forward_broadcasts(
    id: Uuid,
    mut updates: broadcast::Receiver<ServerEvent>,
    outbox: mpsc::Sender<ServerEvent>,
) {
    loop {
        tokio::select! {
            _ = outbox.closed() => break,
            received = updates.recv() => match received {
                Ok(event) => {
                    if outbox.send(event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // later snapshots supersede the skipped ones
                    tracing::warn!("[Hub] Client {} lagged, skipped {} snapshots", id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!("[Hub] Stopped forwarding to client {}", id);
}

/// Apply one connection's events in the order they arrived.
///
/// Ends once every handle for the connection is dropped and the queue drains.
async fn run_dispatcher(dispatcher: Dispatcher, mut queued: mpsc::Receiver<ClientEvent>) {
    while let Some(event) = queued.recv().await {
        dispatcher.dispatch(event).await;
    }
    tracing::debug!("[Hub] Stopped dispatching for client {}", dispatcher.id);
}

/// One accepted connection: the inbound handle plus the outbound event queue
#[derive(Debug)]
pub struct HubConnection {
    handle: ClientHandle,
    events: mpsc::Receiver<ServerEvent>,
}

impl HubConnection {
    /// Connection id
    pub fn id(&self) -> Uuid {
        self.handle.id()
    }

    /// Handle for submitting inbound events
    pub fn handle(&self) -> ClientHandle {
        self.handle.clone()
    }

    /// Next event to deliver to this socket
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.events.try_recv().ok()
    }

    /// Split into the inbound handle and the outbound queue
    pub fn into_parts(self) -> (ClientHandle, mpsc::Receiver<ServerEvent>) {
        (self.handle, self.events)
    }
}

/// Runs mutations for one connection and reports their outcome
#[derive(Debug, Clone)]
struct Dispatcher {
    id: Uuid,
    hub: SyncHub,
    outbox: mpsc::Sender<ServerEvent>,
}

impl Dispatcher {
    async fn emit(&self, event: ServerEvent) -> bool {
        self.outbox.send(event).await.is_ok()
    }

    async fn dispatch(&self, event: ClientEvent) {
        let name = event.name();
        let failure = event.failure_message();
        let gateway = self.hub.gateway();

        tracing::debug!("[Hub] Client {} sent {}", self.id, name);

        let result = match event {
            ClientEvent::CreateNote { fields } => gateway.create(fields).await.map(drop),
            ClientEvent::UpdateNote { id, fields } => gateway.update(id, fields).await.map(drop),
            ClientEvent::DeleteNote { id } => gateway.delete(id).await.map(drop),
        };

        match result {
            Ok(()) => {
                self.hub.push_notes().await;
            }
            Err(e) => {
                tracing::error!("[Hub] {} from client {} failed: {}", name, self.id, e);
                self.emit(ServerEvent::error(failure)).await;
            }
        }
    }
}

/// Inbound side of a connection
#[derive(Debug, Clone)]
pub struct ClientHandle {
    dispatcher: Dispatcher,
    inbox: mpsc::Sender<ClientEvent>,
}

impl ClientHandle {
    /// Connection id
    pub fn id(&self) -> Uuid {
        self.dispatcher.id
    }

    /// Send an event to this socket only
    pub async fn emit(&self, event: ServerEvent) -> bool {
        self.dispatcher.emit(event).await
    }

    /// Decode a text frame and queue it for dispatch.
    ///
    /// Returns `false` if the frame did not decode, in which case the socket
    /// is answered with an `invalid event` error.
    pub async fn handle_frame(&self, frame: &str) -> bool {
        match ClientEvent::from_frame(frame) {
            Ok(event) => self.submit(event).await,
            Err(e) => {
                tracing::warn!("[Hub] Client {} sent an invalid frame: {}", self.id(), e);
                self.emit(ServerEvent::error(messages::INVALID_EVENT)).await;
                false
            }
        }
    }

    /// Queue an event behind this connection's earlier events
    pub async fn submit(&self, event: ClientEvent) -> bool {
        if self.inbox.send(event).await.is_err() {
            tracing::warn!("[Hub] Client {} dispatcher has stopped", self.id());
            return false;
        }
        true
    }

    /// Apply a mutation right away, bypassing the queue, then broadcast the
    /// new snapshot or report the failure
    pub async fn dispatch(&self, event: ClientEvent) {
        self.dispatcher.dispatch(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::notes::MemoryNoteStore;
    use crate::shared::{FieldValue, Fields, NoteId, Snapshot};
    use std::time::Duration;
    use tokio::time::timeout;

    fn hub() -> SyncHub {
        SyncHub::new(NoteGateway::from_store(MemoryNoteStore::default()), 16)
    }

    async fn next(conn: &mut HubConnection) -> ServerEvent {
        timeout(Duration::from_secs(2), conn.recv())
            .await
            .expect("timed out waiting for event")
            .expect("connection closed")
    }

    fn title(text: &str) -> Fields {
        Fields::from([("title".to_string(), FieldValue::from(text))])
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_first_event() {
        let hub = hub();
        let mut conn = hub.connect().await;
        assert_eq!(next(&mut conn).await, ServerEvent::Notes(Snapshot::new()));
        assert!(conn.try_recv().is_none());
        assert_eq!(hub.client_count(), 1);
    }

    #[tokio::test]
    async fn test_create_broadcasts_to_sender() {
        let hub = hub();
        let mut conn = hub.connect().await;
        next(&mut conn).await;

        conn.handle()
            .dispatch(ClientEvent::CreateNote { fields: title("x") })
            .await;

        match next(&mut conn).await {
            ServerEvent::Notes(snapshot) => {
                assert_eq!(snapshot.len(), 1);
                let note = snapshot.notes().next().unwrap();
                assert_eq!(note.field("title"), Some(&FieldValue::from("x")));
            }
            other => panic!("Expected notes, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_update_is_scoped_to_sender() {
        let hub = hub();
        let mut sender = hub.connect().await;
        let mut other = hub.connect().await;
        next(&mut sender).await;
        next(&mut other).await;

        sender
            .handle()
            .dispatch(ClientEvent::UpdateNote {
                id: NoteId::new(),
                fields: title("y"),
            })
            .await;

        assert_eq!(next(&mut sender).await, ServerEvent::error("update failed"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(other.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_invalid_frame_gets_error() {
        let hub = hub();
        let mut conn = hub.connect().await;
        next(&mut conn).await;

        assert!(!conn.handle().handle_frame("[\"dropNotes\"]").await);
        assert_eq!(next(&mut conn).await, ServerEvent::error("invalid event"));
    }

    #[tokio::test]
    async fn test_fetch_failure_on_connect() {
        let hub = hub();
        hub.gateway().close().await;
        let mut conn = hub.connect().await;
        assert_eq!(next(&mut conn).await, ServerEvent::error("fetch failed"));
    }

    #[tokio::test]
    async fn test_dropped_connection_unsubscribes() {
        let hub = hub();
        let conn = hub.connect().await;
        assert_eq!(hub.client_count(), 1);
        drop(conn);

        timeout(Duration::from_secs(2), async {
            while hub.client_count() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("forwarder did not stop");
    }
}
