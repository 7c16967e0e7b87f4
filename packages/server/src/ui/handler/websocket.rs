//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::SessionId,
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

/// Upgrade the request and run a hub session on the socket.
///
/// Served at both `/ws` and `/api/socket/io`.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives encoded events from the rx channel and pushes them to the
/// WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionId::generate();

    // Channel for events pushed to this session. initial-state is queued here
    // before the pusher loop starts, so it is always the first frame.
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = state
        .connect_session_usecase
        .execute(session_id.clone(), tx)
        .await
    {
        tracing::warn!("Rejecting session '{}': {}", session_id, e);
        return;
    }

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let session_id_clone = session_id.clone();

    // Spawn a task to receive events from this session
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", session_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_message(&state_clone, &session_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state
        .disconnect_session_usecase
        .execute(session_id.clone())
        .await
    {
        tracing::warn!("Failed to disconnect session '{}': {}", session_id, e);
    }
}

/// Decode one text frame and dispatch it. Frames that do not decode are dropped.
async fn handle_client_message(state: &AppState, session_id: &SessionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(
                "Dropping undecodable frame from '{}': {} ({})",
                session_id,
                e,
                text
            );
            return;
        }
    };

    let result = match message {
        ClientMessage::UpdateVisuals(patch) => state
            .update_visuals_usecase
            .execute(session_id, patch.into())
            .await
            .map(|_| ()),
        ClientMessage::ChangeTheme(theme) => state
            .change_theme_usecase
            .execute(session_id, theme)
            .await
            .map(|_| ()),
        ClientMessage::TriggerEffect(effect_id) => state
            .trigger_effect_usecase
            .execute(session_id, effect_id)
            .await
            .map(|_| ()),
    };

    if let Err(e) = result {
        tracing::warn!("Failed to relay event from '{}': {}", session_id, e);
    }
}
