//! Port for the remote task store service.

use crate::board::domain::{Lane, Task, TaskFields, TaskId, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Remote task store contract.
///
/// Every board mutation round-trips through the store; the records it
/// returns are authoritative.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns a full snapshot of every task.
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>>;

    /// Returns the user directory.
    async fn list_users(&self) -> TaskStoreResult<Vec<User>>;

    /// Creates a task. The store assigns the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::UserNotFound`] when the assignee is unknown
    /// or [`TaskStoreError::Rejected`] when the payload fails validation.
    async fn create_task(&self, fields: &TaskFields) -> TaskStoreResult<Task>;

    /// Replaces every editable attribute of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> TaskStoreResult<Task>;

    /// Moves a task to `lane`.
    ///
    /// Resending the same identifier and lane is safe and yields the same
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update_task_status(&self, id: TaskId, lane: Lane) -> TaskStoreResult<Task>;

    /// Sets or clears the assignee of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist or
    /// [`TaskStoreError::UserNotFound`] when the user is unknown.
    async fn update_task_assignee(
        &self,
        id: TaskId,
        assignee: Option<UserId>,
    ) -> TaskStoreResult<Task>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The referenced user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The store refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-layer failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
