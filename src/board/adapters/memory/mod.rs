//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! tests and for running the board without a remote service.

mod notifier;
mod store;

pub use notifier::RecordingNotifier;
pub use store::{InMemoryTaskStore, StoreOperation};
