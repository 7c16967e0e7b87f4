//! Repository 実装
//!
//! - `inmemory`: プロセス内に状態を保持する実装（プロセス終了で消える）

pub mod inmemory;

pub use inmemory::{InMemoryHubRepository, InMemoryRecordRepository};
