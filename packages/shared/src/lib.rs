//! Utilities shared by the Merlinfest server and client crates.

pub mod logger;
pub mod time;
