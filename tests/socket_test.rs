//! End-to-end tests over a real listener: health route and the WebSocket hub

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use notehub::backend::server::NoteServer;
use notehub::shared::{ServerConfig, ServerEvent, Snapshot};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let config = ServerConfig::builder()
            .database_url("memory://")
            .host(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .port(0)
            .build()
            .unwrap();
        let server = NoteServer::bind(config).await.unwrap();
        let addr = server.local_addr();

        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            server
                .serve_with_shutdown(async {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown,
            task,
        }
    }

    async fn socket(&self) -> Socket {
        let (socket, _) = connect_async(format!("ws://{}/socket", self.addr))
            .await
            .unwrap();
        socket
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        timeout(Duration::from_secs(5), self.task)
            .await
            .expect("server did not shut down")
            .unwrap();
    }
}

async fn recv(socket: &mut Socket) -> ServerEvent {
    loop {
        let msg = timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return ServerEvent::from_frame(text.as_str()).unwrap();
        }
    }
}

async fn recv_notes(socket: &mut Socket) -> Snapshot {
    match recv(socket).await {
        ServerEvent::Notes(snapshot) => snapshot,
        other => panic!("Expected notes event, got {:?}", other),
    }
}

async fn send(socket: &mut Socket, frame: serde_json::Value) {
    socket
        .send(Message::text(frame.to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_health_route_greets() {
    let server = TestServer::start().await;

    let body = reqwest::get(format!("http://{}/", server.addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "hi");

    server.stop().await;
}

#[tokio::test]
async fn test_two_clients_see_the_same_board() {
    let server = TestServer::start().await;
    let mut a = server.socket().await;
    let mut b = server.socket().await;
    assert!(recv_notes(&mut a).await.is_empty());
    assert!(recv_notes(&mut b).await.is_empty());

    send(&mut a, json!(["createNote", {"title": "x", "x": 10, "y": 20}])).await;
    let on_a = recv_notes(&mut a).await;
    let on_b = recv_notes(&mut b).await;
    assert_eq!(on_a, on_b);
    let id = on_a.notes().next().unwrap().id;

    send(&mut b, json!(["updateNote", id.to_string(), {"title": "y"}])).await;
    for socket in [&mut a, &mut b] {
        let snapshot = recv_notes(socket).await;
        let note = snapshot.get(&id).unwrap();
        assert_eq!(
            serde_json::to_value(note).unwrap(),
            json!({"id": id.to_string(), "title": "y", "x": 10, "y": 20})
        );
    }

    send(&mut a, json!(["deleteNote", id.to_string()])).await;
    assert!(recv_notes(&mut a).await.is_empty());
    assert!(recv_notes(&mut b).await.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_bad_frames_get_errors_on_the_sender() {
    let server = TestServer::start().await;
    let mut a = server.socket().await;
    recv_notes(&mut a).await;

    send(&mut a, json!(["renameNote", "whatever"])).await;
    assert_eq!(recv(&mut a).await, ServerEvent::error("invalid event"));

    send(&mut a, json!(["createNote", {"x": "left"}])).await;
    assert_eq!(recv(&mut a).await, ServerEvent::error("create failed"));

    // the socket stays usable after errors
    send(&mut a, json!(["createNote", {"title": "ok"}])).await;
    assert_eq!(recv_notes(&mut a).await.len(), 1);

    server.stop().await;
}
