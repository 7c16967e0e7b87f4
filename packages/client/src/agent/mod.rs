//! Client sync agent.
//!
//! `SyncClient` keeps a local copy of the hub's visual state, forwards
//! local intents to the hub and reconnects on its own, escalating through
//! the configured connection profiles.

mod listeners;
mod runner;
mod session;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use merlinfest_server::{
    domain::{Timestamp, VisualState, VisualStatePatch},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
};
use merlinfest_shared::time::{Clock, SystemClock};
use tokio::sync::{Notify, mpsc};
use tokio_tungstenite::tungstenite::http::Uri;

pub use listeners::{Subscription, SyncEvent, SyncEventKind};
pub use state::{ConnectionState, LocalView};

use crate::{
    error::ClientError,
    retry::{ConnectionProfile, RetryPolicy},
};
use listeners::ListenerRegistry;

pub const DEFAULT_URL: &str = "ws://127.0.0.1:8080/ws";
pub const DEFAULT_FALLBACK_URL: &str = "ws://127.0.0.1:8080/api/socket/io";
/// Alternate socket path served by the same hub.
pub const FALLBACK_PATH: &str = "/api/socket/io";

/// Where and how persistently to connect.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Tried in order; the first is the primary transport.
    pub profiles: Vec<ConnectionProfile>,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Build one profile per URL, each allowed `retry.max_attempts` attempts.
    pub fn from_urls<I, S>(urls: I, retry: RetryPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let profiles = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| {
                let name = if i == 0 {
                    "primary".to_string()
                } else {
                    format!("fallback-{i}")
                };
                ConnectionProfile::new(name, url, retry.max_attempts)
            })
            .collect();
        Self { profiles, retry }
    }

    /// Build a primary profile for `primary` plus a fallback on the same
    /// host at `FALLBACK_PATH`.
    pub fn with_derived_fallback(primary: impl Into<String>, retry: RetryPolicy) -> Self {
        let primary = primary.into();
        match Self::derive_fallback_url(&primary) {
            Some(fallback) => Self::from_urls([primary, fallback], retry),
            None => {
                tracing::warn!("Cannot derive a fallback URL from '{}'", primary);
                Self::from_urls([primary], retry)
            }
        }
    }

    /// Keep scheme, host and port of `primary` and swap the path for
    /// `FALLBACK_PATH`. `None` if `primary` is not an absolute URL.
    pub fn derive_fallback_url(primary: &str) -> Option<String> {
        let uri: Uri = primary.parse().ok()?;
        let scheme = uri.scheme_str()?;
        let authority = uri.authority()?;
        Some(format!("{}://{}{}", scheme, authority, FALLBACK_PATH))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_urls([DEFAULT_URL, DEFAULT_FALLBACK_URL], RetryPolicy::default())
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Link {
    /// Bumped on every connect/disconnect so a stale runner can tell it has
    /// been superseded.
    generation: u64,
    state: ConnectionState,
    outbound: Option<mpsc::UnboundedSender<String>>,
    shutdown: Option<Arc<Notify>>,
}

/// State shared between the `SyncClient` handle and its runner task.
pub(crate) struct Shared {
    config: ClientConfig,
    clock: Arc<dyn Clock>,
    listeners: Arc<ListenerRegistry>,
    view: Mutex<LocalView>,
    link: Mutex<Link>,
}

impl Shared {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    fn is_current(&self, generation: u64) -> bool {
        lock(&self.link).generation == generation
    }

    /// Move to `state` if `generation` is still the live one.
    fn transition(
        &self,
        generation: u64,
        state: ConnectionState,
        outbound: Option<mpsc::UnboundedSender<String>>,
    ) -> bool {
        let mut link = lock(&self.link);
        if link.generation != generation {
            return false;
        }
        link.state = state;
        link.outbound = outbound;
        if state == ConnectionState::Disconnected {
            link.shutdown = None;
        }
        true
    }

    fn emit(&self, generation: u64, event: SyncEvent) {
        if self.is_current(generation) {
            self.listeners.emit(&event);
        }
    }

    /// Decode one text frame from the hub and fold it into the local view.
    fn handle_server_frame(&self, generation: u64, text: &str) {
        let message = match serde_json::from_str::<ServerMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                let error = ClientError::Decode(e.to_string());
                tracing::warn!("Dropping server frame: {}", error);
                return;
            }
        };

        if !self.is_current(generation) {
            tracing::debug!("Ignoring frame from a superseded session");
            return;
        }

        let now = self.now();
        let applied = lock(&self.view).apply(message, now);
        match applied {
            Ok(event) => {
                tracing::debug!("Received {}", event.kind().name());
                self.emit(generation, event);
            }
            Err(e) => tracing::warn!("Dropping server event: {}", e),
        }
    }

    fn connected_outbound(&self) -> Option<mpsc::UnboundedSender<String>> {
        let link = lock(&self.link);
        match link.state {
            ConnectionState::Connected => link.outbound.clone(),
            _ => None,
        }
    }
}

/// Handle to the sync agent.
///
/// `connect` spawns the runner on the current Tokio runtime.
pub struct SyncClient {
    shared: Arc<Shared>,
}

impl SyncClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ClientConfig, clock: Arc<dyn Clock>) -> Self {
        let view = LocalView::new(Timestamp::new(clock.now_millis()));
        Self {
            shared: Arc::new(Shared {
                config,
                clock,
                listeners: Arc::new(ListenerRegistry::default()),
                view: Mutex::new(view),
                link: Mutex::new(Link {
                    generation: 0,
                    state: ConnectionState::Disconnected,
                    outbound: None,
                    shutdown: None,
                }),
            }),
        }
    }

    /// Start connecting. Does nothing unless currently disconnected.
    pub fn connect(&self) {
        let mut link = lock(&self.shared.link);
        if link.state != ConnectionState::Disconnected {
            tracing::debug!("connect() ignored: already {:?}", link.state);
            return;
        }
        link.generation += 1;
        link.state = ConnectionState::Connecting;
        let shutdown = Arc::new(Notify::new());
        link.shutdown = Some(Arc::clone(&shutdown));
        let generation = link.generation;
        drop(link);

        tokio::spawn(runner::run_connection_loop(
            Arc::clone(&self.shared),
            generation,
            shutdown,
        ));
    }

    /// Close the connection and stop reconnecting. Idempotent.
    pub fn disconnect(&self) {
        let was_connected = {
            let mut link = lock(&self.shared.link);
            if link.state == ConnectionState::Disconnected {
                return;
            }
            let was_connected = link.state == ConnectionState::Connected;
            link.generation += 1;
            link.state = ConnectionState::Disconnected;
            link.outbound = None;
            if let Some(shutdown) = link.shutdown.take() {
                shutdown.notify_one();
            }
            was_connected
        };

        tracing::info!("Disconnected from hub");
        if was_connected {
            self.shared.listeners.emit(&SyncEvent::Disconnect {
                reason: "client disconnect".to_string(),
            });
        }
    }

    /// Register `callback` for events of `kind`.
    pub fn on<F>(&self, kind: SyncEventKind, callback: F) -> Subscription
    where
        F: Fn(&SyncEvent) + Send + Sync + 'static,
    {
        let id = self.shared.listeners.add(kind, Arc::new(callback));
        Subscription::new(id, &self.shared.listeners)
    }

    /// Apply `patch` locally and send it to the hub.
    ///
    /// Returns `false` (and changes nothing) when not connected.
    pub fn update_visuals(&self, patch: VisualStatePatch) -> bool {
        let Some(outbound) = self.shared.connected_outbound() else {
            tracing::warn!("Not connected; dropping update-visuals");
            return false;
        };
        let now = self.shared.now();
        lock(&self.shared.view).apply_optimistic_patch(patch.clone(), now);
        send(&outbound, &ClientMessage::UpdateVisuals(patch.into()))
    }

    /// Apply `theme` locally and send it to the hub.
    pub fn change_theme(&self, theme: impl Into<String>) -> bool {
        let theme = theme.into();
        let Some(outbound) = self.shared.connected_outbound() else {
            tracing::warn!("Not connected; dropping change-theme");
            return false;
        };
        let now = self.shared.now();
        lock(&self.shared.view).apply_optimistic_theme(theme.clone(), now);
        send(&outbound, &ClientMessage::ChangeTheme(theme))
    }

    /// Ask the hub to fire a one-shot effect. Local state is untouched.
    pub fn trigger_effect(&self, effect_id: impl Into<String>) -> bool {
        let Some(outbound) = self.shared.connected_outbound() else {
            tracing::warn!("Not connected; dropping trigger-effect");
            return false;
        };
        send(&outbound, &ClientMessage::TriggerEffect(effect_id.into()))
    }

    pub fn visual_state(&self) -> VisualState {
        lock(&self.shared.view).visual_state.clone()
    }

    pub fn user_count(&self) -> usize {
        lock(&self.shared.view).user_count()
    }

    pub fn last_effect(&self) -> Option<String> {
        lock(&self.shared.view).last_effect.clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        lock(&self.shared.link).state
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }
}

impl Drop for SyncClient {
    fn drop(&mut self) {
        let mut link = lock(&self.shared.link);
        link.generation += 1;
        link.outbound = None;
        if let Some(shutdown) = link.shutdown.take() {
            shutdown.notify_one();
        }
    }
}

fn send(outbound: &mpsc::UnboundedSender<String>, message: &ClientMessage) -> bool {
    let frame = match serde_json::to_string(message) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Failed to encode client event: {}", e);
            return false;
        }
    };
    outbound.send(frame).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use merlinfest_server::domain::ParametersPatch;
    use merlinfest_shared::time::FixedClock;

    fn client() -> SyncClient {
        SyncClient::with_clock(
            ClientConfig::default(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        )
    }

    #[test]
    fn test_default_config_has_primary_and_fallback() {
        // テスト項目: デフォルト設定は /ws を優先し、/api/socket/io にフォールバックする
        // given (前提条件):
        let config = ClientConfig::default();

        // when (操作):
        let urls: Vec<&str> = config.profiles.iter().map(|p| p.url.as_str()).collect();

        // then (期待する結果):
        assert_eq!(urls, vec![DEFAULT_URL, DEFAULT_FALLBACK_URL]);
        assert_eq!(config.profiles[0].name, "primary");
        assert_eq!(config.profiles[1].name, "fallback-1");
        assert!(config.profiles.iter().all(|p| p.max_attempts == 5));
    }

    #[test]
    fn test_derive_fallback_url_keeps_host_and_port() {
        // テスト項目: フォールバック URL は優先 URL のスキーム・ホスト・ポートを保ち、パスだけを差し替える
        // given (前提条件):
        let primary = "ws://festival.local:8080/ws";

        // when (操作):
        let fallback = ClientConfig::derive_fallback_url(primary);
        let secure = ClientConfig::derive_fallback_url("wss://hub.example.com/ws?room=main");
        let invalid = ClientConfig::derive_fallback_url("/ws");

        // then (期待する結果):
        assert_eq!(
            fallback.as_deref(),
            Some("ws://festival.local:8080/api/socket/io")
        );
        assert_eq!(secure.as_deref(), Some("wss://hub.example.com/api/socket/io"));
        assert_eq!(invalid, None);
    }

    #[test]
    fn test_with_derived_fallback_builds_two_profiles_on_same_host() {
        // テスト項目: 優先 URL だけを指定すると、同じホストの /api/socket/io がフォールバックになる
        // given (前提条件):
        let retry = RetryPolicy::default();

        // when (操作):
        let config = ClientConfig::with_derived_fallback("ws://festival.local:8080/ws", retry);
        let unparsable = ClientConfig::with_derived_fallback("not a url", retry);

        // then (期待する結果):
        let urls: Vec<&str> = config.profiles.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "ws://festival.local:8080/ws",
                "ws://festival.local:8080/api/socket/io"
            ]
        );
        assert_eq!(config.profiles[1].name, "fallback-1");
        assert_eq!(unparsable.profiles.len(), 1);
    }

    #[test]
    fn test_frames_from_superseded_session_leave_view_untouched() {
        // テスト項目: 切り替わった後の古いセッションのフレームはローカルの状態を変えず、イベントも発行しない
        // given (前提条件):
        let client = client();
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        let _subscription = client.on(SyncEventKind::ThemeChanged, move |_| {
            *lock(&counter) += 1;
        });
        let frame = r#"{"event":"theme-changed","data":{"theme":"wizard"}}"#;
        let stale = lock(&client.shared.link).generation + 1;

        // when (操作):
        client.shared.handle_server_frame(stale, frame);

        // then (期待する結果):
        assert_eq!(client.visual_state().active_theme, "default");
        assert_eq!(*lock(&fired), 0);

        // when (操作): 現在の世代のフレーム
        let current = lock(&client.shared.link).generation;
        client.shared.handle_server_frame(current, frame);

        // then (期待する結果):
        assert_eq!(client.visual_state().active_theme, "wizard");
        assert_eq!(*lock(&fired), 1);
    }

    #[test]
    fn test_intents_are_noops_while_disconnected() {
        // テスト項目: 未接続の間の操作は何もせず、ローカルの状態も変えない
        // given (前提条件):
        let client = client();
        let before = client.visual_state();

        // when (操作):
        let updated = client.update_visuals(VisualStatePatch::parameters(ParametersPatch {
            speed: Some(80.0),
            ..Default::default()
        }));
        let themed = client.change_theme("wizard");
        let triggered = client.trigger_effect("sparkle");

        // then (期待する結果):
        assert!(!updated && !themed && !triggered);
        assert_eq!(client.visual_state(), before);
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_disconnect_when_disconnected_is_silent() {
        // テスト項目: 未接続での disconnect は何もせず、イベントも発行しない
        // given (前提条件):
        let client = client();
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        let _subscription = client.on(SyncEventKind::Disconnect, move |_| {
            *lock(&counter) += 1;
        });

        // when (操作):
        client.disconnect();
        client.disconnect();

        // then (期待する結果):
        assert_eq!(*lock(&fired), 0);
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    }
}
