//! UseCase 層
//!
//! Hub の各操作を 1 つのユースケースとして実装します。
//! Hub のユースケースは全て `HubEventLoop` のターンを取ってから実行されるため、
//! 変更とその通知はイベントごとに完了してから次のイベントに進みます。

pub mod change_theme;
pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod festival_records;
pub mod get_visual_state;
pub mod trigger_effect;
pub mod update_visuals;

use tokio::sync::{Mutex, MutexGuard};

pub use change_theme::ChangeThemeUseCase;
pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{BroadcastError, ConnectError, DisconnectError, RecordError};
pub use festival_records::FestivalRecordsUseCase;
pub use get_visual_state::GetVisualStateUseCase;
pub use trigger_effect::TriggerEffectUseCase;
pub use update_visuals::UpdateVisualsUseCase;

/// Serializes hub events.
///
/// Holding a turn covers both the state change and its fan-out, so a session
/// never sees a broadcast that was computed before its `initial-state`.
#[derive(Debug, Default)]
pub struct HubEventLoop {
    turn: Mutex<()>,
}

impl HubEventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the current event to finish and start the next one.
    pub async fn turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }
}
