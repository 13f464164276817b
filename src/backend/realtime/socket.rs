use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

use crate::backend::realtime::hub::SyncHub;
use crate::shared::event::messages;
use crate::shared::ServerEvent;

/// Handle WebSocket upgrade request (GET /socket)
pub async fn websocket_handler(ws: WebSocketUpgrade, State(hub): State<SyncHub>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Pump frames between one WebSocket and the hub until either side closes
async fn handle_socket(socket: WebSocket, hub: SyncHub) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (client, mut events) = hub.connect().await.into_parts();
    let client_id = client.id();

    // Outgoing: hub events to socket frames
    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let frame = match event.to_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("[Socket] Failed to encode {} event: {}", event.name(), e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Incoming: socket frames to hub events
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                client.handle_frame(text.as_str()).await;
            }
            Ok(Message::Binary(bin)) => match std::str::from_utf8(&bin) {
                Ok(text) => {
                    client.handle_frame(text).await;
                }
                Err(_) => {
                    tracing::warn!("[Socket] Client {} sent a non-UTF-8 binary frame", client_id);
                    client.emit(ServerEvent::error(messages::INVALID_EVENT)).await;
                }
            },
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::warn!("[Socket] Client {} socket error: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    writer.abort();
    tracing::info!("[Socket] Client {} disconnected", client_id);
}
