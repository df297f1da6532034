//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod notifier;
pub mod store;

pub use notifier::{Notification, NotificationKind, Notifier, Severity};
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
