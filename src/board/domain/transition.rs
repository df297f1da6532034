//! Phases of an optimistic lane transition.

use super::{Lane, TaskDomainError, TaskId, TransitionId};
use serde::{Deserialize, Serialize};

/// Phase of a single optimistic lane transition.
///
/// ```text
/// Idle -> LocalApplied -> Reconciling -> Committed
///                                     -> RolledBack
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    /// No change has been made.
    Idle,
    /// The lane change is visible locally but has not been sent.
    LocalApplied,
    /// The status change request is in flight.
    Reconciling,
    /// The store confirmed the change and its record replaced the local one.
    Committed,
    /// The store rejected the change and the prior lane was restored.
    RolledBack,
}

impl TransitionPhase {
    /// Returns the canonical representation used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LocalApplied => "local_applied",
            Self::Reconciling => "reconciling",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }

    /// Returns `true` when `next` directly follows this phase.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::LocalApplied)
                | (Self::LocalApplied, Self::Reconciling)
                | (Self::Reconciling, Self::Committed | Self::RolledBack)
        )
    }

    /// Returns `true` for phases that settle a transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

/// One optimistic lane change and the snapshot needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneTransition {
    id: TransitionId,
    task_id: TaskId,
    prior_lane: Lane,
    target_lane: Lane,
    phase: TransitionPhase,
}

impl LaneTransition {
    /// Starts an idle transition moving `task_id` from `prior_lane` to
    /// `target_lane`.
    #[must_use]
    pub fn begin(task_id: TaskId, prior_lane: Lane, target_lane: Lane) -> Self {
        Self {
            id: TransitionId::new(),
            task_id,
            prior_lane,
            target_lane,
            phase: TransitionPhase::Idle,
        }
    }

    /// Moves the transition to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPhaseAdvance`] when `next` does not
    /// directly follow the current phase. The phase is left unchanged.
    pub fn advance(&mut self, next: TransitionPhase) -> Result<(), TaskDomainError> {
        if !self.phase.can_advance_to(next) {
            return Err(TaskDomainError::InvalidPhaseAdvance {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Returns the transition identifier.
    #[must_use]
    pub const fn id(&self) -> TransitionId {
        self.id
    }

    /// Returns the task being moved.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the lane captured before the local change.
    #[must_use]
    pub const fn prior_lane(&self) -> Lane {
        self.prior_lane
    }

    /// Returns the requested lane.
    #[must_use]
    pub const fn target_lane(&self) -> Lane {
        self.target_lane
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> TransitionPhase {
        self.phase
    }
}
