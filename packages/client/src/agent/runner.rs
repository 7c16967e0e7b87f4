//! Connection loop: retry with backoff, escalate through profiles, and
//! reconnect after a dropped session.

use std::sync::Arc;

use tokio::sync::{Notify, mpsc};
use tokio_tungstenite::connect_async;

use super::{
    ConnectionState, Shared, SyncEvent,
    session::{SessionEnd, run_session},
};
use crate::{error::ClientError, retry::AttemptPlan};

pub(crate) async fn run_connection_loop(shared: Arc<Shared>, generation: u64, shutdown: Arc<Notify>) {
    let mut resuming = false;

    loop {
        let mut plan = AttemptPlan::new(&shared.config.profiles, &shared.config.retry, resuming);

        let established = loop {
            let Some(planned) = plan.next() else {
                break None;
            };
            let profile = &shared.config.profiles[planned.profile_index];

            if !planned.delay.is_zero() {
                tracing::info!(
                    "Retrying {} in {}ms",
                    profile.name,
                    planned.delay.as_millis()
                );
                tokio::select! {
                    _ = shutdown.notified() => return,
                    _ = tokio::time::sleep(planned.delay) => {}
                }
            }

            tracing::info!(
                "Attempting to connect to {} via {} (attempt {}/{})",
                profile.url,
                profile.name,
                planned.attempt,
                profile.max_attempts
            );

            let result = tokio::select! {
                _ = shutdown.notified() => return,
                result = connect_async(profile.url.as_str()) => result,
            };

            match result {
                Ok((ws_stream, _)) => break Some((ws_stream, profile.name.clone())),
                Err(e) => {
                    let error = ClientError::ConnectionError(e.to_string());
                    tracing::warn!("{} attempt {} failed: {}", profile.name, planned.attempt, error);
                    shared.emit(
                        generation,
                        SyncEvent::ConnectError {
                            profile: profile.name.clone(),
                            attempt: planned.attempt,
                            error: error.to_string(),
                        },
                    );
                }
            }
        };

        let Some((ws_stream, profile_name)) = established else {
            tracing::error!("Gave up connecting after exhausting every connection profile");
            if shared.transition(generation, ConnectionState::Disconnected, None) {
                shared.listeners.emit(&SyncEvent::GaveUp);
            }
            return;
        };

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        if !shared.transition(generation, ConnectionState::Connected, Some(outbound_tx)) {
            return;
        }
        tracing::info!("Connected to hub via {}", profile_name);
        shared.emit(
            generation,
            SyncEvent::Connect {
                profile: profile_name,
            },
        );

        match run_session(&shared, generation, ws_stream, outbound_rx, &shutdown).await {
            SessionEnd::Shutdown => return,
            SessionEnd::Dropped(reason) => {
                tracing::warn!("Connection lost: {}", reason);
                if !shared.transition(generation, ConnectionState::Connecting, None) {
                    return;
                }
                shared.emit(generation, SyncEvent::Disconnect { reason });
                resuming = true;
            }
        }
    }
}
