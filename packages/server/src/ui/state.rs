//! Shared application state.

use std::sync::Arc;

use merlinfest_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    domain::{HubRepository, HubState, MessagePusher, RecordRepository, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryHubRepository, InMemoryRecordRepository},
    },
    usecase::{
        ChangeThemeUseCase, ConnectSessionUseCase, DisconnectSessionUseCase,
        FestivalRecordsUseCase, GetVisualStateUseCase, HubEventLoop, TriggerEffectUseCase,
        UpdateVisualsUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（セッション接続のユースケース）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（セッション切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// UpdateVisualsUseCase（ビジュアル更新のユースケース）
    pub update_visuals_usecase: Arc<UpdateVisualsUseCase>,
    /// ChangeThemeUseCase（テーマ変更のユースケース）
    pub change_theme_usecase: Arc<ChangeThemeUseCase>,
    /// TriggerEffectUseCase（エフェクト発火のユースケース）
    pub trigger_effect_usecase: Arc<TriggerEffectUseCase>,
    /// GetVisualStateUseCase（現在の状態取得のユースケース）
    pub get_visual_state_usecase: Arc<GetVisualStateUseCase>,
    /// FestivalRecordsUseCase（フェスティバル記録のユースケース）
    pub festival_records_usecase: Arc<FestivalRecordsUseCase>,
}

impl AppState {
    /// Wire every use case to the given repositories and pusher.
    pub fn new(
        hub_repository: Arc<dyn HubRepository>,
        record_repository: Arc<dyn RecordRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let event_loop = Arc::new(HubEventLoop::new());

        Self {
            connect_session_usecase: Arc::new(ConnectSessionUseCase::new(
                hub_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                event_loop.clone(),
            )),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
                hub_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                event_loop.clone(),
            )),
            update_visuals_usecase: Arc::new(UpdateVisualsUseCase::new(
                hub_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                event_loop.clone(),
            )),
            change_theme_usecase: Arc::new(ChangeThemeUseCase::new(
                hub_repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                event_loop.clone(),
            )),
            trigger_effect_usecase: Arc::new(TriggerEffectUseCase::new(
                hub_repository.clone(),
                message_pusher,
                event_loop,
            )),
            get_visual_state_usecase: Arc::new(GetVisualStateUseCase::new(hub_repository)),
            festival_records_usecase: Arc::new(FestivalRecordsUseCase::new(
                record_repository,
                clock,
            )),
        }
    }

    /// Build the state with in-memory repositories and the WebSocket pusher.
    ///
    /// The visual state starts at its defaults with `lastUpdated` set to now.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let hub = Arc::new(Mutex::new(HubState::new(Timestamp::new(
            clock.now_millis(),
        ))));

        Self::new(
            Arc::new(InMemoryHubRepository::new(hub)),
            Arc::new(InMemoryRecordRepository::new()),
            Arc::new(WebSocketMessagePusher::default()),
            clock,
        )
    }
}
