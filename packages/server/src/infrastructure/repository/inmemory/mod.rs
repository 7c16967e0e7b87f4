//! インメモリ Repository 実装

pub mod hub;
pub mod record;

pub use hub::InMemoryHubRepository;
pub use record::InMemoryRecordRepository;
