//! Domain layer: entities, value objects and the interfaces the hub needs.
//!
//! Nothing here depends on axum or on the wire format.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod record;
pub mod repository;
pub mod value_object;

pub use entity::{
    HubState, ParametersPatch, Session, VisualParameters, VisualState, VisualStatePatch,
};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use event::HubEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use record::{
    Dj, Interaction, NewDj, NewInteraction, NewVote, StoredVisualState, StoredVisualStateInput,
    User, Vote,
};
pub use repository::{HubRepository, RecordRepository};
pub use value_object::{SessionId, Timestamp, UserId};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
