//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    domain::{NewDj, NewInteraction, NewVote},
    infrastructure::dto::{
        http::{
            CreateDjRequest, CreateInteractionRequest, CreateUserRequest, CreateVoteRequest,
            DjDto, InteractionDto, StoredVisualStateDto, UpsertVisualStateRequest, UserDto,
            VoteDto,
        },
        websocket::VisualStateDto,
    },
    ui::{error::ApiError, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint returning the live visual state
pub async fn debug_visual_state(State(state): State<Arc<AppState>>) -> Json<VisualStateDto> {
    let visual_state = state.get_visual_state_usecase.execute().await;
    Json(VisualStateDto::from(&visual_state))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let Json(request) = payload?;
    let user = state
        .festival_records_usecase
        .create_user(request.nickname)
        .await;
    Ok(Json(user.into()))
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserDto>> {
    let users = state.festival_records_usecase.list_users().await;
    Json(users.into_iter().map(Into::into).collect())
}

pub async fn create_vote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateVoteRequest>, JsonRejection>,
) -> Result<Json<VoteDto>, ApiError> {
    let Json(request) = payload?;
    let vote = NewVote::try_from(request)?;
    let vote = state.festival_records_usecase.cast_vote(vote).await?;
    Ok(Json(vote.into()))
}

pub async fn list_votes(State(state): State<Arc<AppState>>) -> Json<Vec<VoteDto>> {
    let votes = state.festival_records_usecase.list_votes().await;
    Json(votes.into_iter().map(Into::into).collect())
}

pub async fn create_interaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateInteractionRequest>, JsonRejection>,
) -> Result<Json<InteractionDto>, ApiError> {
    let Json(request) = payload?;
    let interaction = NewInteraction::try_from(request)?;
    let interaction = state
        .festival_records_usecase
        .record_interaction(interaction)
        .await?;
    Ok(Json(interaction.into()))
}

pub async fn list_interactions(State(state): State<Arc<AppState>>) -> Json<Vec<InteractionDto>> {
    let interactions = state.festival_records_usecase.list_interactions().await;
    Json(interactions.into_iter().map(Into::into).collect())
}

/// Upsert the persisted visual state. The live hub state is left untouched.
pub async fn upsert_visual_state(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpsertVisualStateRequest>, JsonRejection>,
) -> Result<Json<StoredVisualStateDto>, ApiError> {
    let Json(request) = payload?;
    let stored = state
        .festival_records_usecase
        .save_visual_state(request.into())
        .await;
    Ok(Json(stored.into()))
}

/// Returns `null` until a visual state has been saved.
pub async fn get_visual_state(
    State(state): State<Arc<AppState>>,
) -> Json<Option<StoredVisualStateDto>> {
    let stored = state.festival_records_usecase.get_saved_visual_state().await;
    Json(stored.map(Into::into))
}

pub async fn create_dj(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateDjRequest>, JsonRejection>,
) -> Result<Json<DjDto>, ApiError> {
    let Json(request) = payload?;
    let dj = NewDj::try_from(request)?;
    let dj = state.festival_records_usecase.create_dj(dj).await;
    Ok(Json(dj.into()))
}

pub async fn list_djs(State(state): State<Arc<AppState>>) -> Json<Vec<DjDto>> {
    let djs = state.festival_records_usecase.list_djs().await;
    Json(djs.into_iter().map(Into::into).collect())
}
