use super::messages::{ClientMessage, ServerMessage};
use super::state::LobbyState;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

const OUTBOX_CAPACITY: usize = 64;

/// Serve one lobby client until either side hangs up
pub async fn handle_connection(socket: WebSocket, state: Arc<LobbyState>) {
    let sri = uuid::Uuid::new_v4().to_string();
    info!(sri, "New lobby WebSocket connection");

    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = broadcast::channel::<ServerMessage>(OUTBOX_CAPACITY);

    state.connect(&sri, tx.clone());
    let _ = tx.send(ServerMessage::Seeks {
        seeks: state.seeks_for_client(&sri),
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = next_outgoing(&mut rx).await {
            debug!(?msg, "Sending message to client");
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize server message");
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(receive_loop(receiver, tx, state.clone(), sri.clone()));

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.disconnect(&sri);
    state.publish();
    info!(sri, "Lobby WebSocket connection closed");
}

/// Next message for the client. A lagging client skips what it missed; the
/// following lobby list supersedes it.
async fn next_outgoing(rx: &mut broadcast::Receiver<ServerMessage>) -> Option<ServerMessage> {
    loop {
        match rx.recv().await {
            Ok(msg) => return Some(msg),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Lobby client lagging, dropped messages");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    tx: broadcast::Sender<ServerMessage>,
    state: Arc<LobbyState>,
    sri: String,
) {
    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) else {
            warn!(sri, raw = %text, "Failed to parse client message");
            continue;
        };

        handle_message(&state, &sri, client_msg, &tx).await;
    }
}

async fn handle_message(
    state: &LobbyState,
    sri: &str,
    msg: ClientMessage,
    tx: &broadcast::Sender<ServerMessage>,
) {
    match msg {
        ClientMessage::Hello { username } => {
            state.identify(sri, username);
            let _ = tx.send(ServerMessage::Seeks {
                seeks: state.seeks_for_client(sri),
            });
        }
        ClientMessage::AddSeek => match state.add_seek(sri).await {
            Ok(seek) => {
                let _ = tx.send(ServerMessage::SeekCreated { seek });
                state.publish();
            }
            Err(e) => {
                debug!(sri, error = %e, "Seek refused");
                let _ = tx.send(e.into());
            }
        },
        ClientMessage::CancelSeek { id } => match state.cancel_seek(sri, &id) {
            Ok(_) => state.publish(),
            Err(e) => {
                debug!(sri, seek_id = id, error = %e, "Cancel refused");
                let _ = tx.send(e.into());
            }
        },
        ClientMessage::JoinSeek { id } => match state.join_seek(sri, &id) {
            Ok(pairing) => {
                state.send_to(
                    &pairing.owner_sri,
                    ServerMessage::Paired {
                        seek_id: pairing.seek.id.clone(),
                        opponent: pairing.joiner,
                    },
                );
                let _ = tx.send(ServerMessage::Paired {
                    seek_id: pairing.seek.id,
                    opponent: pairing.owner,
                });
                state.publish();
            }
            Err(e) => {
                debug!(sri, seek_id = id, error = %e, "Join refused");
                let _ = tx.send(e.into());
            }
        },
    }
}
