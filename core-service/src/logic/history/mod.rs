//! History Module - Detection log
//!
//! Persists `{filename, verdict, probability, timestamp}` per scan.

pub mod record;
pub mod store;

pub use record::DetectionLogRecord;
pub use store::{HistoryStore, SqliteHistoryStore};
