//! Festival records stored alongside the realtime hub.
//!
//! These rows are independent of the live `VisualState`: writing a
//! `StoredVisualState` never changes what connected sessions see.

use super::{
    error::DomainError,
    value_object::{Timestamp, UserId},
};

/// Row id of the single persisted visual state.
pub const STORED_VISUAL_STATE_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub nickname: Option<String>,
    pub joined_at: Timestamp,
    pub last_active: Timestamp,
    pub vote_count: u32,
}

impl User {
    pub fn new(id: UserId, nickname: Option<String>, joined_at: Timestamp) -> Self {
        Self {
            id,
            nickname,
            joined_at,
            last_active: joined_at,
            vote_count: 0,
        }
    }

    /// Count one more vote and mark the user active.
    pub fn record_vote(&mut self, at: Timestamp) {
        self.vote_count += 1;
        self.mark_active(at);
    }

    pub fn mark_active(&mut self, at: Timestamp) {
        self.last_active = self.last_active.max(at);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub id: u64,
    pub user_id: UserId,
    pub theme: String,
    pub created_at: Timestamp,
}

/// Vote before the repository assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVote {
    pub user_id: UserId,
    pub theme: String,
}

impl NewVote {
    pub fn new(user_id: UserId, theme: String) -> Result<Self, DomainError> {
        if theme.trim().is_empty() {
            return Err(DomainError::EmptyField("theme"));
        }
        Ok(Self { user_id, theme })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: u64,
    pub user_id: UserId,
    pub action_type: String,
    /// Free-form JSON supplied by the client.
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub user_id: UserId,
    pub action_type: String,
    pub details: serde_json::Value,
}

impl NewInteraction {
    pub fn new(
        user_id: UserId,
        action_type: String,
        details: serde_json::Value,
    ) -> Result<Self, DomainError> {
        if action_type.trim().is_empty() {
            return Err(DomainError::EmptyField("actionType"));
        }
        Ok(Self {
            user_id,
            action_type,
            details,
        })
    }
}

/// Fields accepted when upserting the persisted visual state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVisualStateInput {
    pub active_theme: String,
    pub speed: f64,
    pub intensity: f64,
    pub color_scheme: String,
    pub effect_ids: Vec<String>,
}

/// The single persisted visual-state row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVisualState {
    pub id: u64,
    pub active_theme: String,
    pub speed: f64,
    pub intensity: f64,
    pub color_scheme: String,
    pub effect_ids: Vec<String>,
    pub active_users: usize,
    pub last_updated: Timestamp,
}

impl StoredVisualState {
    pub fn from_input(input: StoredVisualStateInput, last_updated: Timestamp) -> Self {
        Self {
            id: STORED_VISUAL_STATE_ID,
            active_theme: input.active_theme,
            speed: input.speed,
            intensity: input.intensity,
            color_scheme: input.color_scheme,
            effect_ids: input.effect_ids,
            active_users: 0,
            last_updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dj {
    pub id: u64,
    pub name: String,
    pub set_start: Timestamp,
    pub set_end: Timestamp,
    pub visual_preset: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDj {
    pub name: String,
    pub set_start: Timestamp,
    pub set_end: Timestamp,
    pub visual_preset: String,
}

impl NewDj {
    pub fn new(
        name: String,
        set_start: Timestamp,
        set_end: Timestamp,
        visual_preset: String,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyField("name"));
        }
        if set_end < set_start {
            return Err(DomainError::InvalidSetWindow);
        }
        Ok(Self {
            name,
            set_start,
            set_end,
            visual_preset,
        })
    }
}
