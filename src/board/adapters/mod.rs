//! Adapters for the task board ports.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryTaskStore`]: thread-safe in-memory task store with
//!   fault injection
//! - [`memory::RecordingNotifier`]: notifier that keeps every notification
//! - [`logging::TracingNotifier`]: notifier that emits `tracing` events

pub mod logging;
pub mod memory;
