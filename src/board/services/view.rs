//! Read-only projections handed to the presentation layer.

use crate::board::domain::{Lane, Priority, Task, TaskFields, TaskId, User};
use chrono::NaiveDate;

/// Tasks of one lane, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneView {
    lane: Lane,
    tasks: Vec<Task>,
}

impl LaneView {
    pub(crate) const fn new(lane: Lane, tasks: Vec<Task>) -> Self {
        Self { lane, tasks }
    }

    /// Returns the lane.
    #[must_use]
    pub const fn lane(&self) -> Lane {
        self.lane
    }

    /// Returns the column heading.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.lane.title()
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the identifiers of the tasks in display order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(Task::id).collect()
    }

    /// Returns the number of tasks in the lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the lane shows its "no tasks" placeholder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Display projection of a task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    /// Task identifier.
    pub id: TaskId,
    /// Card heading.
    pub title: String,
    /// Optional body text.
    pub description: Option<String>,
    /// Priority badge.
    pub priority: Priority,
    /// Short due date such as `Oct 19`.
    pub due_label: Option<String>,
    /// Whether the due date has passed for unfinished work.
    pub overdue: bool,
    /// Parsed tag tokens.
    pub tags: Vec<String>,
    /// Display name of the assignee, when one is set and known.
    pub assignee_name: Option<String>,
}

impl TaskCard {
    /// Projects a task for display, resolving the assignee against `users`.
    #[must_use]
    pub fn project(task: &Task, users: &[User], today: NaiveDate) -> Self {
        let assignee_name = task.assignee_id().and_then(|assignee| {
            users
                .iter()
                .find(|user| user.id() == assignee)
                .map(|user| user.name().to_owned())
        });
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority(),
            due_label: task
                .due_date()
                .map(|due| due.format("%b %-d").to_string()),
            overdue: task.is_overdue(today),
            tags: task.tags().as_slice().to_vec(),
            assignee_name,
        }
    }
}

/// State of the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    /// No form is open.
    #[default]
    Closed,
    /// A blank form for a new task is open.
    Creating,
    /// A form prefilled from an existing task is open.
    Editing {
        /// Task being edited.
        task_id: TaskId,
        /// Attributes the form was populated with.
        form: TaskFields,
    },
}

impl EditorState {
    /// Returns the task being edited, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<TaskId> {
        match self {
            Self::Editing { task_id, .. } => Some(*task_id),
            Self::Closed | Self::Creating => None,
        }
    }

    /// Returns `true` when a form is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}
