//! In-memory task collection backing the board.

use super::{Lane, Task, TaskId};

/// Ordered, addressable set of task records.
///
/// Order is the order in which tasks first entered the collection; replacing
/// a record keeps its position. Identifiers are unique and every task sits in
/// exactly one lane because the lane is a single field of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a full store snapshot.
    ///
    /// A record repeated later in the snapshot replaces the earlier one.
    #[must_use]
    pub fn from_snapshot(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut collection = Self::new();
        for task in tasks {
            collection.upsert(task);
        }
        collection
    }

    /// Inserts a task, or replaces the record with the same identifier in
    /// place.
    ///
    /// Returns the record that was replaced, if any.
    pub fn upsert(&mut self, task: Task) -> Option<Task> {
        match self.position(task.id()) {
            Some(index) => self
                .tasks
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, task)),
            None => {
                self.tasks.push(task);
                None
            }
        }
    }

    /// Returns the task with the given identifier.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns `true` when a task with the identifier is present.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Removes and returns the task with the given identifier.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        self.position(id).map(|index| self.tasks.remove(index))
    }

    /// Replaces the task's record with a copy placed in `lane`.
    ///
    /// Returns the lane the task was in before, or `None` when the task is
    /// absent.
    pub fn set_lane(&mut self, id: TaskId, lane: Lane) -> Option<Lane> {
        let current = self.get(id)?;
        let prior = current.lane();
        let moved = current.with_lane(lane);
        self.upsert(moved);
        Some(prior)
    }

    /// Tasks in `lane`, in collection order.
    #[must_use]
    pub fn by_lane(&self, lane: Lane) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.lane() == lane)
            .cloned()
            .collect()
    }

    /// Iterates over every task in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the collection holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }
}
