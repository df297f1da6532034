//! Error types for board domain validation and parsing.

use super::{TransitionPhase, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// Task identifiers are assigned by the store and are never zero.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(u64),

    /// User identifiers are assigned by the directory and are never zero.
    #[error("invalid user id {0}, expected a positive integer")]
    InvalidUserId(u64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The requested assignee is not present in the user directory.
    #[error("unknown assignee: {0}")]
    UnknownAssignee(UserId),

    /// A lane transition attempted an illegal phase change.
    #[error("invalid transition phase change from {} to {}", from.as_str(), to.as_str())]
    InvalidPhaseAdvance {
        /// Phase the transition was in.
        from: TransitionPhase,
        /// Phase that was requested.
        to: TransitionPhase,
    },
}

/// Error returned while parsing a lane from its wire representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown lane: {0}")]
pub struct ParseLaneError(pub String);

/// Error returned while parsing a task priority from its wire representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing a numeric identifier from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid identifier: {0}")]
pub struct ParseIdError(pub String);
