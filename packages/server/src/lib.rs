//! Merlinfest realtime hub.
//!
//! Holds one shared visual state for the festival and relays changes between
//! connected sessions over WebSocket. Also serves simple HTTP routes for the
//! festival records.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
