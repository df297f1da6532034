//! Task records and the payload used to create or edit them.

use super::{Lane, Priority, TaskDomainError, TaskId, Tags, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Editable task attributes sent to the task store on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    title: String,
    description: Option<String>,
    #[serde(rename = "status")]
    lane: Lane,
    priority: Priority,
    due_date: Option<NaiveDate>,
    tags: Option<String>,
    assignee_id: Option<UserId>,
}

impl TaskFields {
    /// Creates a payload with the given title and default attributes
    /// (lane `todo`, priority `medium`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            description: None,
            lane: Lane::Todo,
            priority: Priority::default(),
            due_date: None,
            tags: None,
            assignee_id: None,
        })
    }

    /// Sets the description. Blank descriptions are stored as absent.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Sets the lane.
    #[must_use]
    pub const fn with_lane(mut self, lane: Lane) -> Self {
        self.lane = lane;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the raw comma-delimited tag string.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = non_blank(tags.into());
        self
    }

    /// Sets or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lane.
    #[must_use]
    pub const fn lane(&self) -> Lane {
        self.lane
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the raw tag string, if any.
    #[must_use]
    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Task record as returned by the task store.
///
/// Records are immutable from the board's point of view: every change
/// produces a new copy, so a snapshot taken before an optimistic update
/// can always be restored exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    #[serde(rename = "status")]
    lane: Lane,
    priority: Priority,
    due_date: Option<NaiveDate>,
    tags: Option<String>,
    assignee_id: Option<UserId>,
    #[serde(default = "initial_revision")]
    revision: u64,
}

const fn initial_revision() -> u64 {
    1
}

impl Task {
    /// Builds the first revision of a task from a create payload.
    #[must_use]
    pub fn from_fields(id: TaskId, fields: &TaskFields) -> Self {
        Self {
            id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            lane: fields.lane,
            priority: fields.priority,
            due_date: fields.due_date,
            tags: fields.tags.clone(),
            assignee_id: fields.assignee_id,
            revision: initial_revision(),
        }
    }

    /// Returns a copy with every editable attribute replaced by `fields`.
    ///
    /// The identifier and revision are kept.
    #[must_use]
    pub fn with_fields(&self, fields: &TaskFields) -> Self {
        Self {
            revision: self.revision,
            ..Self::from_fields(self.id, fields)
        }
    }

    /// Returns a copy placed in `lane`.
    #[must_use]
    pub fn with_lane(&self, lane: Lane) -> Self {
        Self {
            lane,
            ..self.clone()
        }
    }

    /// Returns a copy with the assignee replaced.
    #[must_use]
    pub fn with_assignee(&self, assignee_id: Option<UserId>) -> Self {
        Self {
            assignee_id,
            ..self.clone()
        }
    }

    /// Returns this record with its revision advanced by one.
    #[must_use]
    pub fn revised(mut self) -> Self {
        self.revision = self.revision.saturating_add(1);
        self
    }

    /// Returns the editable attributes of this task, for populating an
    /// edit form.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            lane: self.lane,
            priority: self.priority,
            due_date: self.due_date,
            tags: self.tags.clone(),
            assignee_id: self.assignee_id,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lane the task is in.
    #[must_use]
    pub const fn lane(&self) -> Lane {
        self.lane
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the raw comma-delimited tag string, if any.
    #[must_use]
    pub fn raw_tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    /// Returns the parsed display tags.
    #[must_use]
    pub fn tags(&self) -> Tags {
        self.tags.as_deref().map(Tags::parse).unwrap_or_default()
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the store revision of this record.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` when the task is unfinished and its due date lies
    /// before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.lane != Lane::Done && self.due_date.is_some_and(|due| due < today)
    }
}

/// Member of the external user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}
