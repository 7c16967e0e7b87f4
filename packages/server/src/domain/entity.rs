//! Hub entities: the shared visual state, its patches, and live sessions.
//!
//! `HubState` is the aggregate root. It owns both the `VisualState` and the
//! live session set so that `active_users` can only change together with the
//! set it counts.

use super::{
    error::DomainError,
    value_object::{SessionId, Timestamp},
};

pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_SPEED: f64 = 50.0;
pub const DEFAULT_INTENSITY: f64 = 50.0;
pub const DEFAULT_COLOR_SCHEME: &str = "#ff5500";

/// Tunable rendering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualParameters {
    pub speed: f64,
    pub intensity: f64,
    pub color_scheme: String,
    /// Ordered list of active effect identifiers.
    pub effect_ids: Vec<String>,
}

impl Default for VisualParameters {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            intensity: DEFAULT_INTENSITY,
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            effect_ids: Vec::new(),
        }
    }
}

impl VisualParameters {
    fn apply_patch(&mut self, patch: ParametersPatch) {
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        if let Some(intensity) = patch.intensity {
            self.intensity = intensity;
        }
        if let Some(color_scheme) = patch.color_scheme {
            self.color_scheme = color_scheme;
        }
        if let Some(effect_ids) = patch.effect_ids {
            self.effect_ids = effect_ids;
        }
    }
}

/// Partial update of `VisualParameters`. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParametersPatch {
    pub speed: Option<f64>,
    pub intensity: Option<f64>,
    pub color_scheme: Option<String>,
    pub effect_ids: Option<Vec<String>>,
}

/// Partial update of `VisualState` submitted by a client.
///
/// `active_users` and `last_updated` are deliberately absent: both are owned
/// by the hub.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualStatePatch {
    pub active_theme: Option<String>,
    pub parameters: Option<ParametersPatch>,
}

impl VisualStatePatch {
    /// Patch that only changes the theme.
    pub fn theme(theme: impl Into<String>) -> Self {
        Self {
            active_theme: Some(theme.into()),
            parameters: None,
        }
    }

    /// Patch that only changes rendering parameters.
    pub fn parameters(parameters: ParametersPatch) -> Self {
        Self {
            active_theme: None,
            parameters: Some(parameters),
        }
    }
}

/// The shared visual state broadcast to every session.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub active_theme: String,
    pub parameters: VisualParameters,
    pub active_users: usize,
    pub last_updated: Timestamp,
}

impl VisualState {
    /// Create the start-of-process state with hard-coded defaults.
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            active_theme: DEFAULT_THEME.to_string(),
            parameters: VisualParameters::default(),
            active_users: 0,
            last_updated: created_at,
        }
    }

    /// Merge `patch` into the state. Present fields overwrite, absent fields
    /// are kept; `parameters` is merged field by field.
    pub fn apply_patch(&mut self, patch: VisualStatePatch, now: Timestamp) {
        if let Some(theme) = patch.active_theme {
            self.active_theme = theme;
        }
        if let Some(parameters) = patch.parameters {
            self.parameters.apply_patch(parameters);
        }
        self.touch(now);
    }

    pub fn set_theme(&mut self, theme: String, now: Timestamp) {
        self.active_theme = theme;
        self.touch(now);
    }

    /// Advance `last_updated`, never moving it backwards.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_updated = self.last_updated.max(now);
    }
}

/// One live client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub connected_at: Timestamp,
}

impl Session {
    pub fn new(id: SessionId, connected_at: Timestamp) -> Self {
        Self { id, connected_at }
    }
}

/// Aggregate root of the realtime hub.
#[derive(Debug, Clone)]
pub struct HubState {
    pub visual_state: VisualState,
    /// Live sessions in connection order.
    pub sessions: Vec<Session>,
}

impl HubState {
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            visual_state: VisualState::new(created_at),
            sessions: Vec::new(),
        }
    }

    /// Add a session and return the new live-session count.
    pub fn add_session(&mut self, session: Session) -> Result<usize, DomainError> {
        if self.contains(&session.id) {
            return Err(DomainError::DuplicateSession(session.id.into_string()));
        }
        let now = session.connected_at;
        self.sessions.push(session);
        self.sync_active_users(now);
        Ok(self.sessions.len())
    }

    /// Remove a session and return the remaining live-session count.
    pub fn remove_session(
        &mut self,
        session_id: &SessionId,
        now: Timestamp,
    ) -> Result<usize, DomainError> {
        let before = self.sessions.len();
        self.sessions.retain(|session| &session.id != session_id);
        if self.sessions.len() == before {
            return Err(DomainError::SessionNotFound(session_id.as_str().to_string()));
        }
        self.sync_active_users(now);
        Ok(self.sessions.len())
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.sessions.iter().any(|session| &session.id == session_id)
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|session| session.id.clone()).collect()
    }

    fn sync_active_users(&mut self, now: Timestamp) {
        self.visual_state.active_users = self.sessions.len();
        self.visual_state.touch(now);
    }
}
