//! Named event listeners with explicit unsubscribe handles.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, Weak,
    atomic::{AtomicU64, Ordering},
};

use merlinfest_server::domain::VisualState;

/// Kinds of events a caller can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncEventKind {
    Connect,
    Disconnect,
    ConnectError,
    InitialState,
    VisualUpdate,
    UserCountUpdate,
    ThemeChanged,
    EffectTriggered,
    /// Every connection profile has been exhausted
    GaveUp,
}

impl SyncEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::ConnectError => "connect-error",
            Self::InitialState => "initial-state",
            Self::VisualUpdate => "visual-update",
            Self::UserCountUpdate => "user-count-update",
            Self::ThemeChanged => "theme-changed",
            Self::EffectTriggered => "effect-triggered",
            Self::GaveUp => "gave-up",
        }
    }
}

/// Event delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Connect { profile: String },
    Disconnect { reason: String },
    ConnectError {
        profile: String,
        attempt: u32,
        error: String,
    },
    InitialState(VisualState),
    VisualUpdate(VisualState),
    UserCountUpdate { count: usize },
    ThemeChanged { theme: String },
    EffectTriggered { effect_id: String },
    GaveUp,
}

impl SyncEvent {
    pub fn kind(&self) -> SyncEventKind {
        match self {
            Self::Connect { .. } => SyncEventKind::Connect,
            Self::Disconnect { .. } => SyncEventKind::Disconnect,
            Self::ConnectError { .. } => SyncEventKind::ConnectError,
            Self::InitialState(_) => SyncEventKind::InitialState,
            Self::VisualUpdate(_) => SyncEventKind::VisualUpdate,
            Self::UserCountUpdate { .. } => SyncEventKind::UserCountUpdate,
            Self::ThemeChanged { .. } => SyncEventKind::ThemeChanged,
            Self::EffectTriggered { .. } => SyncEventKind::EffectTriggered,
            Self::GaveUp => SyncEventKind::GaveUp,
        }
    }
}

pub(crate) type Callback = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

struct Listener {
    id: u64,
    kind: SyncEventKind,
    callback: Callback,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl ListenerRegistry {
    fn lock(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self, kind: SyncEventKind, callback: Callback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(Listener { id, kind, callback });
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Call every listener registered for the event's kind, in registration
    /// order. Callbacks run outside the lock so they may subscribe or
    /// unsubscribe.
    pub(crate) fn emit(&self, event: &SyncEvent) {
        let kind = event.kind();
        let callbacks: Vec<Callback> = self
            .lock()
            .iter()
            .filter(|listener| listener.kind == kind)
            .map(|listener| Arc::clone(&listener.callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

/// Handle returned by `SyncClient::on`.
///
/// Dropping it leaves the listener registered.
#[must_use = "call unsubscribe() to remove the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Arc<ListenerRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Remove the listener. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }
}
