//! One live WebSocket session with the hub.

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::{Notify, mpsc}};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use super::Shared;

pub(crate) type HubStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a session ended.
#[derive(Debug)]
pub(crate) enum SessionEnd {
    /// `disconnect()` was called
    Shutdown,
    /// The transport went away
    Dropped(String),
}

/// Pump frames both ways until shutdown or the transport ends.
pub(crate) async fn run_session(
    shared: &Shared,
    generation: u64,
    ws_stream: HubStream,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    shutdown: &Notify,
) -> SessionEnd {
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    tracing::debug!("Failed to send close frame: {}", e);
                }
                return SessionEnd::Shutdown;
            }
            Some(frame) = outbound_rx.recv() => {
                if let Err(e) = write.send(Message::text(frame)).await {
                    return SessionEnd::Dropped(e.to_string());
                }
            }
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    shared.handle_server_frame(generation, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => {
                    return SessionEnd::Dropped("server closed the connection".to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Dropped(e.to_string()),
            }
        }
    }
}
