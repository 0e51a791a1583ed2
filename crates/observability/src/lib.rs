//! Tracing/logging setup shared by the pipeline binaries.

mod subscriber;

pub use subscriber::{DEFAULT_FILTER, init, init_with};
