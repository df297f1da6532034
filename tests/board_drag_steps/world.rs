//! Shared world state for board drag-and-drop BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryTaskStore, RecordingNotifier},
    domain::TaskId,
    services::{BoardController, BoardResult, TransitionOutcome},
};

/// Board type used by the BDD world.
pub type TestBoard = BoardController<InMemoryTaskStore, RecordingNotifier, DefaultClock>;

/// Scenario world for board behaviour tests.
pub struct BoardWorld {
    pub store: InMemoryTaskStore,
    pub notifier: RecordingNotifier,
    pub board: Option<TestBoard>,
    pub tasks_by_title: HashMap<String, TaskId>,
    pub last_outcome: Option<TransitionOutcome>,
    pub last_delete: Option<BoardResult<()>>,
}

impl BoardWorld {
    /// Creates a world with an empty store and no board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: InMemoryTaskStore::new(),
            notifier: RecordingNotifier::new(),
            board: None,
            tasks_by_title: HashMap::new(),
            last_outcome: None,
            last_delete: None,
        }
    }

    /// Loads the board from the world's store.
    pub fn load_board(&mut self) -> Result<(), eyre::Report> {
        let board = run_async(BoardController::load(
            Arc::new(self.store.clone()),
            Arc::new(self.notifier.clone()),
            Arc::new(DefaultClock),
            taskboard::board::services::BoardConfig::default(),
        ))?;
        self.board = Some(board);
        Ok(())
    }

    /// Returns the loaded board.
    pub fn board(&self) -> Result<&TestBoard, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("board not loaded in scenario world"))
    }

    /// Resolves a task identifier from its scenario title.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks_by_title
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task {title} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
