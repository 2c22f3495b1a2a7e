use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::metrics::{RelayMetrics, CONNECTIONS_CLOSED, CONNECTIONS_OPENED};
use crate::server::AppState;

const CHANNEL_BUFFER_SIZE: usize = 32;

/// WebSocket upgrade handler.
///
/// The presence channel carries no authentication; a connection is
/// anonymous until it sends a registration message.
#[tracing::instrument(name = "ws.upgrade", skip(ws, state))]
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
#[tracing::instrument(name = "ws.connection", skip(socket, state))]
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let connection_start = std::time::Instant::now();

    // Channel for sending messages to this connection
    let (tx, mut rx) = mpsc::channel::<String>(CHANNEL_BUFFER_SIZE);

    CONNECTIONS_OPENED.inc();
    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Task for draining the outbound channel into the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Task for feeding inbound frames to the relay
    let relay = state.relay.clone();
    let sender = tx.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(msg) => {
                    if !process_message(msg, connection_id, &sender, &relay).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task completed");
        }
        _ = recv_task => {
            tracing::debug!(connection_id = %connection_id, "Receive task completed");
        }
    }

    // Drop every session record bound to this connection, if it registered
    let removed = state.registry.remove_connection(connection_id).await;
    RelayMetrics::set_active_sessions(state.registry.len().await);

    CONNECTIONS_CLOSED.inc();
    tracing::info!(
        connection_id = %connection_id,
        identities = ?removed,
        duration_secs = connection_start.elapsed().as_secs_f64(),
        "WebSocket connection closed"
    );
}

/// Process a received WebSocket message.
/// Returns false if the connection should be closed.
async fn process_message(
    msg: Message,
    connection_id: Uuid,
    sender: &mpsc::Sender<String>,
    relay: &crate::relay::PresenceRelay,
) -> bool {
    match msg {
        Message::Text(text) => {
            relay.handle_message(connection_id, sender, &text).await;
            true
        }
        Message::Binary(_) => {
            // The grammar is text-only; binary frames are dropped
            tracing::debug!(connection_id = %connection_id, "Ignoring binary frame");
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Received close frame");
            false
        }
    }
}
