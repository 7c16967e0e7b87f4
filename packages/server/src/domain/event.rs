//! Events the hub pushes to sessions.

use super::entity::VisualState;

/// Server-to-client event, independent of the wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    /// Full snapshot sent only to a freshly connected session.
    InitialState(VisualState),
    /// Full snapshot after a merged patch.
    VisualUpdate(VisualState),
    ThemeChanged { theme: String },
    EffectTriggered { effect_id: String },
    UserCountUpdate { count: usize },
}

impl HubEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            HubEvent::InitialState(_) => "initial-state",
            HubEvent::VisualUpdate(_) => "visual-update",
            HubEvent::ThemeChanged { .. } => "theme-changed",
            HubEvent::EffectTriggered { .. } => "effect-triggered",
            HubEvent::UserCountUpdate { .. } => "user-count-update",
        }
    }
}
