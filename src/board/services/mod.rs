//! Application services for the task board.
//!
//! - [`resolve_target_lane`] maps a finished drag to a lane.
//! - [`TransitionEngine`] applies lane changes optimistically and runs
//!   one-shot mutations against the store.
//! - [`BoardController`] owns the collection and handles presentation
//!   intents.

mod config;
mod controller;
mod drop_resolver;
mod engine;
mod error;
mod state;
mod view;

pub use config::{BoardConfig, ConcurrencyPolicy};
pub use controller::BoardController;
pub use drop_resolver::{DragEnd, resolve_target_lane};
pub use engine::{SkipReason, TransitionEngine, TransitionOutcome};
pub use error::{BoardError, BoardResult, Mutation};
pub use state::BoardState;
pub use view::{EditorState, LaneView, TaskCard};
