//! Live-update channel: one websocket per open inbox view.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{IntoResponse, Response},
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use super::{pages, AppState};
use crate::address;
use crate::store::MessageId;

/// Push frame sent to a viewer. There are no client-to-server messages.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ServerMessage {
    #[serde(rename = "new_mail")]
    NewMail { mailbox: String, id: MessageId },
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(address): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    // Reject malformed addresses before upgrading.
    if let Err(err) = address::normalize(&address) {
        return pages::error_page(&state, err);
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state, address))
        .into_response()
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, address: String) {
    let conn = state.coordinator.connection_id();
    let (tx, mut events) = mpsc::unbounded_channel();

    let subscription = match state.coordinator.register_viewer(&address, conn, tx) {
        Ok(subscription) => subscription,
        Err(_) => return, // validated before the upgrade
    };
    debug!("Viewer {} watching {}", conn, subscription.mailbox());

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                // Only Close is meaningful from the client side.
                Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            event = events.recv() => match event {
                Some(event) => {
                    let push = ServerMessage::NewMail {
                        mailbox: event.mailbox.to_string(),
                        id: event.id,
                    };
                    if let Ok(json) = serde_json::to_string(&push) {
                        if sender.send(WsMessage::Text(json)).await.is_err() {
                            break;
                        }
                    }
                }
                None => break,
            },
        }
    }

    // Every exit path drops the registration; the hub must not keep a
    // queue for a connection that is gone.
    state.coordinator.drop_viewer(&subscription);
    debug!("Viewer {} left {}", conn, subscription.mailbox());
}
