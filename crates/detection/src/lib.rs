//! `lineguard-detection`
//!
//! **Responsibility:** turn a stored image into a `DetectionResult`.
//!
//! - The object store and the anomaly detection service are boundaries (traits);
//!   wire adapters live in `lineguard-infra`.
//! - Nothing here writes anywhere. The invoker is read-only on the object store.

pub mod invoker;
pub mod object_store;
pub mod scorer;

pub use invoker::{DetectionInvoker, metadata};
pub use object_store::{InMemoryObjectStore, ObjectRef, ObjectStore, StoredObject};
pub use scorer::{AnomalyScore, AnomalyScorer, FixedScorer, ModelRef, ScoreRequest};
