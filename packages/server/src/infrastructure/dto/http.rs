//! HTTP API request and response DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub nickname: Option<String>,
    pub joined_at: String,
    pub last_active: String,
    pub vote_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoteRequest {
    pub user_id: String,
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDto {
    pub id: u64,
    pub user_id: String,
    pub theme: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    pub user_id: String,
    pub action_type: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDto {
    pub id: u64,
    pub user_id: String,
    pub action_type: String,
    pub details: serde_json::Value,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertVisualStateRequest {
    pub active_theme: String,
    pub speed: f64,
    pub intensity: f64,
    pub color_scheme: String,
    #[serde(default)]
    pub effect_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVisualStateDto {
    pub id: u64,
    pub active_theme: String,
    pub speed: f64,
    pub intensity: f64,
    pub color_scheme: String,
    pub effect_ids: Vec<String>,
    pub active_users: usize,
    pub last_updated: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDjRequest {
    pub name: String,
    /// RFC 3339
    pub set_start: String,
    /// RFC 3339
    pub set_end: String,
    #[serde(default)]
    pub visual_preset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DjDto {
    pub id: u64,
    pub name: String,
    pub set_start: String,
    pub set_end: String,
    pub visual_preset: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}
