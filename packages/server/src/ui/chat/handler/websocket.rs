//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};

use crate::{
    domain::Connection,
    infrastructure::{
        dto::event::{ClientEvent, ServerEvent},
        sink::{ChannelPeerSink, PusherReceiver},
    },
    ui::{state::AppState, teardown::TeardownGuard},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Spawns a task that drains the connection's channel into the WebSocket.
///
/// Ends when the channel closes (connection released) or the socket rejects
/// a frame. Once it has ended, sends to this connection fail and the next
/// broadcast evicts it.
fn pusher_loop(
    mut rx: PusherReceiver,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            let message = match String::from_utf8(payload) {
                Ok(text) => Message::Text(text.into()),
                Err(e) => Message::Binary(e.into_bytes().into()),
            };
            if sender.send(message).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, peer: SocketAddr) {
    let (sender, mut receiver) = socket.split();

    let (sink, rx) = ChannelPeerSink::new();
    let connection = Arc::new(Connection::new(peer, Box::new(sink), state.now()));

    // connect
    state
        .register_connection_usecase
        .execute(connection.clone())
        .await;
    tracing::info!("Client connected: {}", peer);
    let guard = TeardownGuard::new(state.release_connection_usecase.clone(), connection.clone());

    let mut push_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_event(text.as_str(), &connection, &state).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring {} byte binary frame from {}", data.len(), peer);
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error from {}: {}", peer, e);
                    break;
                }
            },
            _ = connection.closed() => break,
            _ = &mut push_task => break,
        }
    }

    // disconnect
    tracing::info!("Client disconnected: {}", peer);
    guard.finish().await;
}

/// Dispatch one inbound text frame.
pub(crate) async fn handle_event(text: &str, connection: &Connection, state: &AppState) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Ignoring unrecognized event from {}: {}",
                connection.peer_addr(),
                e
            );
            return;
        }
    };

    match event {
        ClientEvent::Log(data) => {
            tracing::info!("logging -> {}", data);
        }
        ClientEvent::SendMessage(data) => {
            tracing::info!("Received message: {}", data);
            let payload = match serde_json::to_vec(&ServerEvent::ReceiveMessage(data)) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("Failed to encode receive_message: {}", e);
                    return;
                }
            };
            state
                .broadcast_message_usecase
                .execute(&payload, connection.id())
                .await;
        }
    }
}
