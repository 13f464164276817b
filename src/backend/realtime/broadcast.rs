/**
 * Snapshot Broadcasting
 *
 * Snapshots fan out over a `tokio::sync::broadcast` channel. Every connected
 * socket holds one receiver, so a single send reaches all of them, including
 * the socket whose mutation triggered it.
 */

use tokio::sync::broadcast;

use crate::shared::ServerEvent;

/// Broadcast channel carrying server events to every connected socket
pub type SnapshotBroadcast = broadcast::Sender<ServerEvent>;

/// Create a broadcast channel with room for `capacity` pending events
pub fn snapshot_channel(capacity: usize) -> SnapshotBroadcast {
    let (tx, _) = broadcast::channel(capacity);
    tx
}

/// Broadcast an event to all subscribers
///
/// # Returns
///
/// Number of subscribers that received the event (0 if nobody is connected)
pub fn broadcast_event(broadcast_tx: &SnapshotBroadcast, event: ServerEvent) -> usize {
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] Event broadcast to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive event");
            0
        }
    }
}
