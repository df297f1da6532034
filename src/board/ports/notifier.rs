//! Port for user-visible failure notifications.

use crate::board::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a notification should interrupt the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The board cannot be shown; rendering must stop.
    Blocking,
    /// The board stays usable; the user is told an action failed.
    Warning,
}

/// Category of the failure being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Loading tasks or users failed.
    LoadFailure,
    /// An optimistic lane change was rejected and rolled back.
    TransitionFailure,
    /// A create, update, assignment or delete failed.
    MutationFailure,
    /// Input was refused before reaching the store.
    InvalidInput,
}

/// Failure notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Failure category.
    pub kind: NotificationKind,
    /// Whether the failure blocks the board.
    pub severity: Severity,
    /// Short message suitable for display.
    pub message: String,
    /// Underlying error description.
    pub detail: String,
    /// Task the failure concerns, if any.
    pub task_id: Option<TaskId>,
    /// When the failure was raised.
    pub raised_at: DateTime<Utc>,
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Presents a notification to the user.
    fn notify(&self, notification: Notification);
}
