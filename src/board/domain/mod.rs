//! Domain model for the task board.
//!
//! Tasks, lanes and the in-memory collection the board renders from, plus
//! the phase machine describing an optimistic lane change. Nothing here
//! performs I/O.

mod collection;
mod droppable;
mod error;
mod ids;
mod lane;
mod tags;
mod task;
mod transition;

pub use collection::TaskCollection;
pub use droppable::DroppableId;
pub use error::{ParseIdError, ParseLaneError, ParsePriorityError, TaskDomainError};
pub use ids::{TaskId, TransitionId, UserId};
pub use lane::{Lane, Priority};
pub use tags::Tags;
pub use task::{Task, TaskFields, User};
pub use transition::{LaneTransition, TransitionPhase};
