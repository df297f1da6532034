//! Service-level errors and their user-visible notifications.

use crate::board::{
    domain::{Lane, TaskDomainError, TaskId},
    ports::{Notification, NotificationKind, Severity, TaskStoreError},
};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// One-shot mutation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// Creating a task.
    Create,
    /// Replacing a task's attributes.
    Update,
    /// Changing a task's assignee.
    Assign,
    /// Deleting a task.
    Delete,
}

impl Mutation {
    /// Returns the canonical representation used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Assign => "assign",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by board services.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// Fetching tasks or users failed; the board cannot be shown.
    #[error("failed to load board: {0}")]
    LoadFailure(#[source] TaskStoreError),

    /// A lane change was rejected by the store and rolled back.
    #[error("failed to move task {task_id} to {target}: {source}")]
    TransitionFailure {
        /// Task that was being moved.
        task_id: TaskId,
        /// Requested lane.
        target: Lane,
        /// Store failure.
        #[source]
        source: TaskStoreError,
    },

    /// A create, update, assignment or delete was rejected; no local state
    /// changed.
    #[error("failed to {operation} task: {source}")]
    MutationFailure {
        /// Attempted mutation.
        operation: Mutation,
        /// Task concerned, absent for creates.
        task_id: Option<TaskId>,
        /// Store failure.
        #[source]
        source: TaskStoreError,
    },

    /// Input was refused before reaching the store.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

impl BoardError {
    /// Returns `true` for failures that prevent the board from rendering.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::LoadFailure(_))
    }

    /// Builds the user-visible notification for this error.
    #[must_use]
    pub fn notification(&self, raised_at: DateTime<Utc>) -> Notification {
        let (kind, severity, message, task_id) = match self {
            Self::LoadFailure(_) => (
                NotificationKind::LoadFailure,
                Severity::Blocking,
                "Failed to load data. Please refresh the page.",
                None,
            ),
            Self::TransitionFailure { task_id, .. } => (
                NotificationKind::TransitionFailure,
                Severity::Warning,
                "Failed to update task status",
                Some(*task_id),
            ),
            Self::MutationFailure {
                operation,
                task_id,
                ..
            } => (
                NotificationKind::MutationFailure,
                Severity::Warning,
                match operation {
                    Mutation::Create | Mutation::Update => "Failed to save task. Please try again.",
                    Mutation::Assign => "Failed to update task assignee",
                    Mutation::Delete => "Failed to delete task",
                },
                *task_id,
            ),
            Self::Domain(_) => (
                NotificationKind::InvalidInput,
                Severity::Warning,
                "The task could not be saved as entered",
                None,
            ),
        };

        Notification {
            kind,
            severity,
            message: message.to_owned(),
            detail: self.to_string(),
            task_id,
            raised_at,
        }
    }
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;
