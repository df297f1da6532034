//! Mapping from a finished drag gesture to the lane it targets.

use crate::board::domain::{DroppableId, Lane, TaskCollection, TaskId};

/// A drag gesture that has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    /// Task whose card was dragged.
    pub dragged: TaskId,
    /// Element under the pointer on release; `None` outside any drop target.
    pub over: Option<DroppableId>,
}

impl DragEnd {
    /// Creates a drag-end event.
    #[must_use]
    pub const fn new(dragged: TaskId, over: Option<DroppableId>) -> Self {
        Self { dragged, over }
    }
}

/// Resolves the lane a drag targets.
///
/// Dropping on a card joins that card's lane; any other identifier is read as
/// a lane name. Returns `None` when the pointer was outside every drop target
/// or the identifier names neither a known task nor a lane.
///
/// The result may equal the dragged task's current lane, and the dragged
/// task may not exist at all; callers treat both as no-ops.
#[must_use]
pub fn resolve_target_lane(event: &DragEnd, collection: &TaskCollection) -> Option<Lane> {
    let over = event.over.as_ref()?;
    let card_lane = over
        .as_task_id()
        .and_then(|id| collection.get(id))
        .map(|task| task.lane());
    let target = card_lane.or_else(|| over.as_lane());
    tracing::debug!(
        dragged = event.dragged.value(),
        over = over.as_str(),
        target = target.map(Lane::as_str),
        "resolved drop target"
    );
    target
}
