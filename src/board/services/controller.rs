//! Board controller: owns the task collection and turns presentation
//! intents into transitions and mutations.

use crate::board::{
    domain::{
        DroppableId, Lane, Task, TaskCollection, TaskDomainError, TaskFields, TaskId,
        TransitionPhase, User, UserId,
    },
    ports::{Notifier, TaskStore, TaskStoreResult},
    services::{
        BoardConfig, BoardError, BoardResult, BoardState, DragEnd, EditorState, LaneView,
        SkipReason, TaskCard, TransitionEngine, TransitionOutcome, resolve_target_lane,
    },
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::watch;

/// Single point of truth for one board session.
///
/// The collection is owned here and only changes through the intent
/// handlers; readers get copies through the view methods.
pub struct BoardController<S, N, C>
where
    S: TaskStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    engine: TransitionEngine<S, N, C>,
    state: BoardState,
    users: RwLock<Vec<User>>,
    editor: Mutex<EditorState>,
    active_drag: Mutex<Option<TaskId>>,
}

impl<S, N, C> BoardController<S, N, C>
where
    S: TaskStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Loads every task and user and opens a board session.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LoadFailure`] when either fetch fails. A
    /// blocking notification is raised and no board is created.
    pub async fn load(
        store: Arc<S>,
        notifier: Arc<N>,
        clock: Arc<C>,
        config: BoardConfig,
    ) -> BoardResult<Self> {
        let engine = TransitionEngine::new(store, notifier, clock, config);
        let (tasks, users) = fetch_snapshot(&engine)
            .await
            .map_err(|source| engine.report(BoardError::LoadFailure(source)))?;
        tracing::info!(tasks = tasks.len(), users = users.len(), "board loaded");

        Ok(Self {
            engine,
            state: BoardState::new(TaskCollection::from_snapshot(tasks)),
            users: RwLock::new(users),
            editor: Mutex::new(EditorState::Closed),
            active_drag: Mutex::new(None),
        })
    }

    /// Rebuilds the collection and user directory from a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LoadFailure`] when either fetch fails. The
    /// previous board stays in place and a blocking notification is raised.
    pub async fn reload(&self) -> BoardResult<()> {
        let (tasks, users) = fetch_snapshot(&self.engine)
            .await
            .map_err(|source| self.engine.report(BoardError::LoadFailure(source)))?;
        tracing::info!(tasks = tasks.len(), users = users.len(), "board reloaded");
        *self.users.write().unwrap_or_else(PoisonError::into_inner) = users;
        self.state.replace(TaskCollection::from_snapshot(tasks));
        Ok(())
    }

    /// Returns every lane with its tasks, in board order.
    #[must_use]
    pub fn lanes(&self) -> BTreeMap<Lane, LaneView> {
        self.state.read(|collection| {
            Lane::ALL
                .into_iter()
                .map(|lane| (lane, LaneView::new(lane, collection.by_lane(lane))))
                .collect()
        })
    }

    /// Returns one lane with its tasks.
    #[must_use]
    pub fn lane(&self, lane: Lane) -> LaneView {
        self.state
            .read(|collection| LaneView::new(lane, collection.by_lane(lane)))
    }

    /// Returns a copy of a task.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state.read(|collection| collection.get(id).cloned())
    }

    /// Returns a copy of every task in collection order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state
            .read(|collection| collection.iter().cloned().collect())
    }

    /// Returns the user directory.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the display card for a task.
    #[must_use]
    pub fn card(&self, id: TaskId) -> Option<TaskCard> {
        let task = self.task(id)?;
        let today = self.engine.clock().utc().date_naive();
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Some(TaskCard::project(&task, &users, today))
    }

    /// Subscribes to collection changes. The value is a revision counter
    /// bumped on every mutation, optimistic ones included.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    /// Returns the current collection revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.revision()
    }

    /// Returns the phase of the in-flight lane transition for a task.
    #[must_use]
    pub fn phase_of(&self, id: TaskId) -> TransitionPhase {
        self.engine.phase_of(id)
    }

    /// Records the start of a drag and returns the dragged task.
    #[must_use]
    pub fn on_drag_started(&self, id: TaskId) -> Option<Task> {
        let task = self.task(id);
        *lock(&self.active_drag) = task.as_ref().map(Task::id);
        task
    }

    /// Returns the task currently being dragged.
    #[must_use]
    pub fn active_drag(&self) -> Option<Task> {
        let active = *lock(&self.active_drag);
        active.and_then(|id| self.task(id))
    }

    /// Finishes a drag: resolves the target lane and runs the optimistic
    /// transition.
    pub async fn on_drag_end(
        &self,
        dragged: TaskId,
        over: Option<DroppableId>,
    ) -> TransitionOutcome {
        *lock(&self.active_drag) = None;
        let event = DragEnd::new(dragged, over);
        let target = self
            .state
            .read(|collection| resolve_target_lane(&event, collection));
        let Some(lane) = target else {
            return TransitionOutcome::Skipped(SkipReason::NoTarget);
        };
        self.engine.transition(&self.state, dragged, lane).await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationFailure`] when the store refuses; the
    /// task stays in its lane.
    pub async fn on_delete(&self, id: TaskId) -> BoardResult<()> {
        self.engine.delete(&self.state, id).await?;
        let mut editor = lock(&self.editor);
        if editor.editing() == Some(id) {
            *editor = EditorState::Closed;
        }
        Ok(())
    }

    /// Opens a blank form for a new task.
    pub fn on_create_requested(&self) {
        *lock(&self.editor) = EditorState::Creating;
    }

    /// Opens the edit form for a task and returns its prefilled attributes.
    ///
    /// Returns `None`, leaving the editor as it was, when the task is not on
    /// the board.
    #[must_use]
    pub fn on_edit_requested(&self, id: TaskId) -> Option<TaskFields> {
        let form = self.task(id)?.fields();
        *lock(&self.editor) = EditorState::Editing {
            task_id: id,
            form: form.clone(),
        };
        Some(form)
    }

    /// Closes the form without saving.
    pub fn on_editor_closed(&self) {
        *lock(&self.editor) = EditorState::Closed;
    }

    /// Returns the form state.
    #[must_use]
    pub fn editor(&self) -> EditorState {
        lock(&self.editor).clone()
    }

    /// Saves the form: updates `editing` when set, creates a task otherwise.
    ///
    /// The form closes on success and stays open on failure.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the assignee is not in the user
    /// directory (no request is sent), or [`BoardError::MutationFailure`]
    /// when the store refuses.
    pub async fn on_save_requested(
        &self,
        fields: &TaskFields,
        editing: Option<TaskId>,
    ) -> BoardResult<Task> {
        self.check_assignee(fields.assignee_id())?;
        let saved = match editing {
            Some(id) => self.engine.update(&self.state, id, fields).await?,
            None => self.engine.create(&self.state, fields).await?,
        };
        self.on_editor_closed();
        Ok(saved)
    }

    /// Sets or clears a task's assignee.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the assignee is not in the user
    /// directory (no request is sent), or [`BoardError::MutationFailure`]
    /// when the store refuses.
    pub async fn on_assignee_changed(
        &self,
        id: TaskId,
        assignee: Option<UserId>,
    ) -> BoardResult<Task> {
        self.check_assignee(assignee)?;
        self.engine.assign(&self.state, id, assignee).await
    }

    fn check_assignee(&self, assignee: Option<UserId>) -> BoardResult<()> {
        let Some(user_id) = assignee else {
            return Ok(());
        };
        let known = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|user| user.id() == user_id);
        if known {
            return Ok(());
        }
        tracing::warn!(user_id = user_id.value(), "refusing unknown assignee");
        Err(self
            .engine
            .report(BoardError::Domain(TaskDomainError::UnknownAssignee(user_id))))
    }
}

async fn fetch_snapshot<S, N, C>(
    engine: &TransitionEngine<S, N, C>,
) -> TaskStoreResult<(Vec<Task>, Vec<User>)>
where
    S: TaskStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    let store = engine.store();
    tokio::try_join!(
        engine.call(store.list_tasks()),
        engine.call(store.list_users())
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
