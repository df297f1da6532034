//! Drop target identifiers reported by the presentation layer.

use super::{Lane, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw identifier of the element under the pointer when a drag ends.
///
/// Lanes register themselves under their wire name and cards under their
/// task id, so the value is either a lane name or a decimal task id. It is
/// kept as text because the board cannot tell which one it is without
/// consulting the current collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DroppableId(String);

impl DroppableId {
    /// Wraps a raw droppable identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the identifier as a task id.
    #[must_use]
    pub fn as_task_id(&self) -> Option<TaskId> {
        self.0.parse().ok()
    }

    /// Interprets the identifier as a lane name.
    #[must_use]
    pub fn as_lane(&self) -> Option<Lane> {
        Lane::try_from(self.0.as_str()).ok()
    }
}

impl From<TaskId> for DroppableId {
    fn from(id: TaskId) -> Self {
        Self(id.to_string())
    }
}

impl From<Lane> for DroppableId {
    fn from(lane: Lane) -> Self {
        Self(lane.as_str().to_owned())
    }
}

impl From<&str> for DroppableId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for DroppableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
