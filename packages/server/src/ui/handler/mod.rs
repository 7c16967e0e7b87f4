//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{
    create_dj, create_interaction, create_user, create_vote, debug_visual_state, get_visual_state,
    health_check, list_djs, list_interactions, list_users, list_votes, upsert_visual_state,
};
pub use websocket::websocket_handler;
