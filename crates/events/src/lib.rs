//! Record store change events.
//!
//! The durable record store emits one change event per write. This crate models
//! those events (tagged attribute images, operation type, origin region) and the
//! batches they are delivered in. It performs no I/O.

pub mod attribute;
pub mod batch;
pub mod change;

pub use attribute::{AttributeValue, Image, names};
pub use batch::ChangeBatch;
pub use change::{ChangeEvent, OperationType, StreamRecord};
