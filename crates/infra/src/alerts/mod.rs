//! Alert routing: classify a persisted record, compose the message, dispatch it.

pub mod message;
pub mod notifier;
pub mod router;

pub use message::{AlertMessage, compose};
pub use notifier::{InMemoryNotifier, Notifier, PublishedAlert};
pub use router::{AlertDispatch, AlertRouter};
