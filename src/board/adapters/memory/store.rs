//! In-memory task store with store-assigned identifiers and fault injection.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{Lane, Task, TaskFields, TaskId, User, UserId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Operations exposed by [`TaskStore`], used for call logs and fault
/// injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`TaskStore::list_tasks`].
    ListTasks,
    /// [`TaskStore::list_users`].
    ListUsers,
    /// [`TaskStore::create_task`].
    CreateTask,
    /// [`TaskStore::update_task`].
    UpdateTask,
    /// [`TaskStore::update_task_status`].
    UpdateTaskStatus,
    /// [`TaskStore::update_task_assignee`].
    UpdateTaskAssignee,
    /// [`TaskStore::delete_task`].
    DeleteTask,
}

/// Thread-safe in-memory task store.
///
/// Behaves like the remote service: identifiers are assigned sequentially,
/// every accepted mutation advances the record's revision and assignees are
/// checked against the user directory. Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    tasks: BTreeMap<TaskId, Task>,
    users: BTreeMap<UserId, User>,
    last_task_id: u64,
    last_user_id: u64,
    faults: HashMap<StoreOperation, usize>,
    calls: Vec<StoreOperation>,
}

fn poisoned(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryStoreState>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state.write().map_err(poisoned)
    }

    /// Adds a user to the directory and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store lock is poisoned.
    pub fn add_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> TaskStoreResult<User> {
        let mut state = self.write()?;
        let id = UserId::new(state.last_user_id.saturating_add(1))
            .map_err(|err| TaskStoreError::Rejected(err.to_string()))?;
        state.last_user_id = id.value();
        let user = User::new(id, name, email);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    /// Inserts a task directly, bypassing the call log and fault injection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::UserNotFound`] when the assignee is unknown.
    pub fn seed_task(&self, fields: &TaskFields) -> TaskStoreResult<Task> {
        let mut state = self.write()?;
        state.insert_task(fields)
    }

    /// Makes the next `count` calls to `operation` fail with a transport
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store lock is poisoned.
    pub fn fail_next(&self, operation: StoreOperation, count: usize) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        *state.faults.entry(operation).or_default() += count;
        Ok(())
    }

    /// Returns every operation invoked through the [`TaskStore`] port, in
    /// call order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store lock is poisoned.
    pub fn calls(&self) -> TaskStoreResult<Vec<StoreOperation>> {
        Ok(self.read()?.calls.clone())
    }

    /// Returns the stored record for a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store lock is poisoned.
    pub fn task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    /// Records the call and consumes a pending fault for it, if any.
    fn begin(
        &self,
        operation: StoreOperation,
    ) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryStoreState>> {
        let mut state = self.write()?;
        state.calls.push(operation);
        let pending = state
            .faults
            .get_mut(&operation)
            .filter(|remaining| **remaining > 0);
        if let Some(remaining) = pending {
            *remaining -= 1;
            return Err(TaskStoreError::transport(std::io::Error::other(format!(
                "injected fault for {operation:?}"
            ))));
        }
        Ok(state)
    }
}

impl InMemoryStoreState {
    fn insert_task(&mut self, fields: &TaskFields) -> TaskStoreResult<Task> {
        self.check_assignee(fields.assignee_id())?;
        let id = TaskId::new(self.last_task_id.saturating_add(1))
            .map_err(|err| TaskStoreError::Rejected(err.to_string()))?;
        self.last_task_id = id.value();
        let task = Task::from_fields(id, fields);
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    fn check_assignee(&self, assignee: Option<UserId>) -> TaskStoreResult<()> {
        match assignee {
            Some(user_id) if !self.users.contains_key(&user_id) => {
                Err(TaskStoreError::UserNotFound(user_id))
            }
            _ => Ok(()),
        }
    }

    fn existing(&self, id: TaskId) -> TaskStoreResult<&Task> {
        self.tasks.get(&id).ok_or(TaskStoreError::NotFound(id))
    }

    fn replace(&mut self, task: Task) -> Task {
        self.tasks.insert(task.id(), task.clone());
        task
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.begin(StoreOperation::ListTasks)?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let state = self.begin(StoreOperation::ListUsers)?;
        Ok(state.users.values().cloned().collect())
    }

    async fn create_task(&self, fields: &TaskFields) -> TaskStoreResult<Task> {
        let mut state = self.begin(StoreOperation::CreateTask)?;
        state.insert_task(fields)
    }

    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> TaskStoreResult<Task> {
        let mut state = self.begin(StoreOperation::UpdateTask)?;
        state.check_assignee(fields.assignee_id())?;
        let updated = state.existing(id)?.with_fields(fields).revised();
        Ok(state.replace(updated))
    }

    async fn update_task_status(&self, id: TaskId, lane: Lane) -> TaskStoreResult<Task> {
        let mut state = self.begin(StoreOperation::UpdateTaskStatus)?;
        let current = state.existing(id)?;
        if current.lane() == lane {
            return Ok(current.clone());
        }
        let moved = current.with_lane(lane).revised();
        Ok(state.replace(moved))
    }

    async fn update_task_assignee(
        &self,
        id: TaskId,
        assignee: Option<UserId>,
    ) -> TaskStoreResult<Task> {
        let mut state = self.begin(StoreOperation::UpdateTaskAssignee)?;
        let current = state.existing(id)?;
        state.check_assignee(assignee)?;
        let reassigned = current.with_assignee(assignee).revised();
        Ok(state.replace(reassigned))
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.begin(StoreOperation::DeleteTask)?;
        state.tasks.remove(&id).ok_or(TaskStoreError::NotFound(id))?;
        Ok(())
    }
}
