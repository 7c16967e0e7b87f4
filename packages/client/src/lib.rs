//! Merlinfest client sync agent and control panel.

pub mod agent;
pub mod control;
pub mod error;
pub mod formatter;
pub mod retry;
pub mod ui;

pub use agent::{
    ClientConfig, ConnectionState, Subscription, SyncClient, SyncEvent, SyncEventKind,
};
pub use error::ClientError;
pub use retry::{ConnectionProfile, RetryPolicy};
