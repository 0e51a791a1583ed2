//! Durable detection records.
//!
//! `RecordWriter` stamps and inserts; the `RecordStore` trait is the storage
//! boundary (in-memory here, DynamoDB in `crate::aws`).

pub mod in_memory;
pub mod r#trait;
pub mod writer;

pub use in_memory::InMemoryRecordStore;
pub use r#trait::RecordStore;
pub use writer::{Clock, RecordWriter, SteppingClock, SystemClock};
