//! Data Transfer Objects (DTOs) for the festival hub.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;

pub use conversion::ConversionError;
