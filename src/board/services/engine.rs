//! Optimistic lane transitions and one-shot task mutations.
//!
//! A lane change is applied to the collection before the store is asked to
//! confirm it. The store's record then replaces the local one, or, when the
//! store refuses, the lane captured before the change is put back. Creates,
//! edits, reassignments and deletes are not optimistic: the collection only
//! changes once the store has accepted them.
//!
//! Lookups always read the in-memory collection, so a second drag on a task
//! whose first drag is still reconciling captures the optimistic lane as its
//! prior lane. If that second transition fails it rolls back to the
//! intermediate lane, which the store may never have confirmed.
//! [`ConcurrencyPolicy::SerializePerTask`] avoids this by refusing the second
//! drag.
//!
//! Dropping a transition future before the store answers abandons the move:
//! the prior lane is restored and the task returns to idle.

use crate::board::{
    domain::{
        Lane, LaneTransition, Task, TaskCollection, TaskFields, TaskId, TransitionId,
        TransitionPhase, UserId,
    },
    ports::{Notifier, TaskStore, TaskStoreError, TaskStoreResult},
    services::{BoardConfig, BoardError, BoardResult, BoardState, ConcurrencyPolicy, Mutation},
};
use mockable::Clock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Why a lane transition was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The drag ended outside every drop target, or on an unknown target.
    NoTarget,
    /// The dragged task is not on the board.
    UnknownTask,
    /// The task is already in the target lane.
    SameLane,
    /// The task has a transition in flight and the policy serialises them.
    InFlight,
}

/// Result of a lane transition.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// Nothing changed and no request was sent.
    Skipped(SkipReason),
    /// The store confirmed the move; its record replaced the local one.
    Committed(Task),
    /// The store refused the move; the prior lane was restored.
    RolledBack {
        /// Task that was moved back.
        task_id: TaskId,
        /// Lane the task is back in.
        restored_lane: Lane,
        /// Store failure.
        cause: TaskStoreError,
    },
    /// A newer transition for the task started while this one was in
    /// flight; its response was discarded.
    Superseded {
        /// Task concerned.
        task_id: TaskId,
        /// Store failure, when the discarded response was one.
        cause: Option<TaskStoreError>,
    },
    /// The task left the board while the request was in flight; the
    /// response was discarded.
    Vanished {
        /// Task concerned.
        task_id: TaskId,
    },
}

impl TransitionOutcome {
    /// Returns `true` when no request was sent.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns the committed record, if the move was confirmed.
    #[must_use]
    pub const fn committed(&self) -> Option<&Task> {
        match self {
            Self::Committed(task) => Some(task),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: TransitionId,
    phase: TransitionPhase,
}

type InFlightMap = HashMap<TaskId, InFlight>;

/// Drives lane transitions and one-shot mutations against a task store.
pub struct TransitionEngine<S, N, C>
where
    S: TaskStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
    config: BoardConfig,
    in_flight: Mutex<InFlightMap>,
}

impl<S, N, C> TransitionEngine<S, N, C>
where
    S: TaskStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates an engine.
    #[must_use]
    pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<C>, config: BoardConfig) -> Self {
        Self {
            store,
            notifier,
            clock,
            config,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns the phase of the newest in-flight transition for a task,
    /// or [`TransitionPhase::Idle`] when none is in flight.
    #[must_use]
    pub fn phase_of(&self, task_id: TaskId) -> TransitionPhase {
        self.lock_in_flight()
            .get(&task_id)
            .map_or(TransitionPhase::Idle, |entry| entry.phase)
    }

    /// Moves a task to `target`, optimistically.
    ///
    /// The collection shows the task in `target` as soon as this future is
    /// first polled, before the store has answered.
    pub async fn transition(
        &self,
        state: &BoardState,
        task_id: TaskId,
        target: Lane,
    ) -> TransitionOutcome {
        let transition = match self.apply_locally(state, task_id, target) {
            Ok(transition) => transition,
            Err(reason) => {
                tracing::debug!(task_id = task_id.value(), ?reason, "lane transition skipped");
                return TransitionOutcome::Skipped(reason);
            }
        };
        let mut pending = PendingTransition {
            in_flight: &self.in_flight,
            state,
            transition,
            settled: false,
        };

        self.advance(&mut pending.transition, TransitionPhase::Reconciling);
        let response = self
            .call(self.store.update_task_status(task_id, target))
            .await;

        let (outcome, failure) = self.resolve(state, &mut pending.transition, response);
        pending.settled = true;
        if let Some(source) = failure {
            self.report(BoardError::TransitionFailure {
                task_id,
                target,
                source,
            });
        }
        outcome
    }

    /// Creates a task and appends the store's record to the collection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationFailure`] when the store refuses; the
    /// collection is unchanged.
    pub async fn create(&self, state: &BoardState, fields: &TaskFields) -> BoardResult<Task> {
        self.one_shot(
            state,
            Mutation::Create,
            None,
            self.store.create_task(fields),
            |collection, task: &Task| {
                collection.upsert(task.clone());
                true
            },
        )
        .await
    }

    /// Replaces a task's attributes and stores the returned record.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationFailure`] when the store refuses; the
    /// collection is unchanged.
    pub async fn update(
        &self,
        state: &BoardState,
        task_id: TaskId,
        fields: &TaskFields,
    ) -> BoardResult<Task> {
        self.one_shot(
            state,
            Mutation::Update,
            Some(task_id),
            self.store.update_task(task_id, fields),
            replace_if_present,
        )
        .await
    }

    /// Sets or clears a task's assignee and stores the returned record.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationFailure`] when the store refuses; the
    /// collection is unchanged.
    pub async fn assign(
        &self,
        state: &BoardState,
        task_id: TaskId,
        assignee: Option<UserId>,
    ) -> BoardResult<Task> {
        self.one_shot(
            state,
            Mutation::Assign,
            Some(task_id),
            self.store.update_task_assignee(task_id, assignee),
            replace_if_present,
        )
        .await
    }

    /// Deletes a task and removes it from the collection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MutationFailure`] when the store refuses; the
    /// task stays where it was.
    pub async fn delete(&self, state: &BoardState, task_id: TaskId) -> BoardResult<()> {
        self.one_shot(
            state,
            Mutation::Delete,
            Some(task_id),
            self.store.delete_task(task_id),
            |collection, _: &()| collection.remove(task_id).is_some(),
        )
        .await
    }

    /// Awaits a store request, bounded by the configured timeout.
    pub(crate) async fn call<T>(
        &self,
        request: impl Future<Output = TaskStoreResult<T>>,
    ) -> TaskStoreResult<T> {
        let Some(limit) = self.config.remote_timeout() else {
            return request.await;
        };
        tokio::time::timeout(limit, request)
            .await
            .unwrap_or_else(|_| Err(TaskStoreError::Timeout(limit)))
    }

    /// Sends `error` to the notifier and hands it back.
    pub(crate) fn report(&self, error: BoardError) -> BoardError {
        self.notifier.notify(error.notification(self.clock.utc()));
        error
    }

    pub(crate) const fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) const fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    fn apply_locally(
        &self,
        state: &BoardState,
        task_id: TaskId,
        target: Lane,
    ) -> Result<LaneTransition, SkipReason> {
        let mut in_flight = self.lock_in_flight();
        if self.config.concurrency == ConcurrencyPolicy::SerializePerTask
            && in_flight.contains_key(&task_id)
        {
            return Err(SkipReason::InFlight);
        }

        let prior_lane = state.apply(|collection| {
            let current = collection
                .get(task_id)
                .ok_or(SkipReason::UnknownTask)?
                .lane();
            if current == target {
                return Err(SkipReason::SameLane);
            }
            collection
                .set_lane(task_id, target)
                .ok_or(SkipReason::UnknownTask)
        })?;

        let mut transition = LaneTransition::begin(task_id, prior_lane, target);
        record_phase(&mut transition, TransitionPhase::LocalApplied);
        in_flight.insert(
            task_id,
            InFlight {
                id: transition.id(),
                phase: transition.phase(),
            },
        );
        tracing::debug!(
            task_id = task_id.value(),
            transition = %transition.id(),
            from = prior_lane.as_str(),
            to = target.as_str(),
            "lane change applied locally"
        );
        Ok(transition)
    }

    /// Settles a transition once the store has answered.
    ///
    /// The in-flight map stays locked until the collection reflects the
    /// response, so no newer drag can slip in between the ownership check
    /// and the write. Returns the outcome and any failure still to report.
    fn resolve(
        &self,
        state: &BoardState,
        transition: &mut LaneTransition,
        response: TaskStoreResult<Task>,
    ) -> (TransitionOutcome, Option<TaskStoreError>) {
        let mut in_flight = self.lock_in_flight();
        let current = self.config.concurrency == ConcurrencyPolicy::LastResponseWins
            || owns(&in_flight, transition);
        let resolved = match (current, response) {
            (true, Ok(record)) => (self.commit(state, &mut in_flight, transition, record), None),
            (true, Err(cause)) => {
                let outcome = roll_back(state, &mut in_flight, transition, cause.clone());
                (outcome, Some(cause))
            }
            (false, response) => discard(state, transition, response),
        };
        if owns(&in_flight, transition) {
            in_flight.remove(&transition.task_id());
        }
        resolved
    }

    fn commit(
        &self,
        state: &BoardState,
        in_flight: &mut InFlightMap,
        transition: &mut LaneTransition,
        record: Task,
    ) -> TransitionOutcome {
        let task_id = transition.task_id();
        let reconciled = state.apply(|collection| {
            if !collection.contains(task_id) {
                return Err(());
            }
            collection.upsert(record.clone());
            Ok(())
        });
        if reconciled.is_err() {
            tracing::info!(
                task_id = task_id.value(),
                transition = %transition.id(),
                "task left the board before its move was confirmed"
            );
            return TransitionOutcome::Vanished { task_id };
        }

        advance_owned(in_flight, transition, TransitionPhase::Committed);
        tracing::info!(
            task_id = task_id.value(),
            transition = %transition.id(),
            lane = record.lane().as_str(),
            revision = record.revision(),
            policy = ?self.config.concurrency,
            "lane change committed"
        );
        TransitionOutcome::Committed(record)
    }

    async fn one_shot<T>(
        &self,
        state: &BoardState,
        operation: Mutation,
        task_id: Option<TaskId>,
        request: impl Future<Output = TaskStoreResult<T>>,
        reconcile: impl FnOnce(&mut TaskCollection, &T) -> bool,
    ) -> BoardResult<T> {
        match self.call(request).await {
            Ok(value) => {
                let applied = state
                    .apply(|collection| reconcile(collection, &value).then_some(()).ok_or(()))
                    .is_ok();
                tracing::info!(
                    operation = operation.as_str(),
                    task_id = task_id.map(TaskId::value),
                    applied,
                    "task mutation confirmed"
                );
                Ok(value)
            }
            Err(source) => {
                tracing::warn!(
                    operation = operation.as_str(),
                    task_id = task_id.map(TaskId::value),
                    error = %source,
                    "task mutation failed"
                );
                Err(self.report(BoardError::MutationFailure {
                    operation,
                    task_id,
                    source,
                }))
            }
        }
    }

    fn advance(&self, transition: &mut LaneTransition, next: TransitionPhase) {
        advance_owned(&mut self.lock_in_flight(), transition, next);
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, InFlightMap> {
        lock_map(&self.in_flight)
    }
}

/// A lane change that has been applied locally but not yet settled.
///
/// Dropping it unsettled, which happens when the transition future is
/// cancelled mid-request, restores the prior lane and clears the in-flight
/// entry, unless a newer transition has taken the task over.
struct PendingTransition<'a> {
    in_flight: &'a Mutex<InFlightMap>,
    state: &'a BoardState,
    transition: LaneTransition,
    settled: bool,
}

impl Drop for PendingTransition<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut in_flight = lock_map(self.in_flight);
        if !owns(&in_flight, &self.transition) {
            return;
        }
        in_flight.remove(&self.transition.task_id());
        let task_id = self.transition.task_id();
        let prior_lane = self.transition.prior_lane();
        let restored = self
            .state
            .apply(|collection| collection.set_lane(task_id, prior_lane).ok_or(()))
            .is_ok();
        tracing::warn!(
            task_id = task_id.value(),
            transition = %self.transition.id(),
            restored = prior_lane.as_str(),
            present = restored,
            "lane change abandoned before the store answered"
        );
    }
}

fn roll_back(
    state: &BoardState,
    in_flight: &mut InFlightMap,
    transition: &mut LaneTransition,
    cause: TaskStoreError,
) -> TransitionOutcome {
    let task_id = transition.task_id();
    let prior_lane = transition.prior_lane();
    let restored = state.apply(|collection| collection.set_lane(task_id, prior_lane).ok_or(()));
    if restored.is_err() {
        tracing::warn!(
            task_id = task_id.value(),
            transition = %transition.id(),
            error = %cause,
            "lane change failed after the task left the board"
        );
        return TransitionOutcome::Vanished { task_id };
    }

    advance_owned(in_flight, transition, TransitionPhase::RolledBack);
    tracing::warn!(
        task_id = task_id.value(),
        transition = %transition.id(),
        restored = prior_lane.as_str(),
        error = %cause,
        "lane change rolled back"
    );
    TransitionOutcome::RolledBack {
        task_id,
        restored_lane: prior_lane,
        cause,
    }
}

/// Handles the response of a transition a newer one has overtaken.
///
/// A confirmed record is still the store's latest word on every field but
/// the lane, so it is adopted under the lane the newer transition shows.
/// A newer transition that later fails then rolls back onto that record.
fn discard(
    state: &BoardState,
    transition: &LaneTransition,
    response: TaskStoreResult<Task>,
) -> (TransitionOutcome, Option<TaskStoreError>) {
    let task_id = transition.task_id();
    match response {
        Ok(record) => {
            let adopted = state
                .apply(|collection| {
                    let shown = collection.get(task_id).ok_or(())?.lane();
                    collection.upsert(record.with_lane(shown));
                    Ok::<(), ()>(())
                })
                .is_ok();
            tracing::debug!(
                task_id = task_id.value(),
                transition = %transition.id(),
                revision = record.revision(),
                adopted,
                "superseded lane change confirmed"
            );
            (TransitionOutcome::Superseded { task_id, cause: None }, None)
        }
        Err(err) => {
            tracing::warn!(
                task_id = task_id.value(),
                transition = %transition.id(),
                error = %err,
                "superseded lane change failed"
            );
            let outcome = TransitionOutcome::Superseded {
                task_id,
                cause: Some(err.clone()),
            };
            (outcome, Some(err))
        }
    }
}

fn replace_if_present(collection: &mut TaskCollection, task: &Task) -> bool {
    if !collection.contains(task.id()) {
        tracing::info!(
            task_id = task.id().value(),
            "task left the board before its change was confirmed"
        );
        return false;
    }
    collection.upsert(task.clone());
    true
}

fn owns(in_flight: &InFlightMap, transition: &LaneTransition) -> bool {
    in_flight
        .get(&transition.task_id())
        .is_some_and(|entry| entry.id == transition.id())
}

fn advance_owned(
    in_flight: &mut InFlightMap,
    transition: &mut LaneTransition,
    next: TransitionPhase,
) {
    record_phase(transition, next);
    let owned = in_flight
        .get_mut(&transition.task_id())
        .filter(|entry| entry.id == transition.id());
    if let Some(entry) = owned {
        entry.phase = transition.phase();
    }
}

fn lock_map(in_flight: &Mutex<InFlightMap>) -> MutexGuard<'_, InFlightMap> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

fn record_phase(transition: &mut LaneTransition, next: TransitionPhase) {
    let from = transition.phase();
    match transition.advance(next) {
        Ok(()) => tracing::debug!(
            task_id = transition.task_id().value(),
            transition = %transition.id(),
            from = from.as_str(),
            to = next.as_str(),
            "transition phase advanced"
        ),
        Err(err) => tracing::error!(
            task_id = transition.task_id().value(),
            transition = %transition.id(),
            error = %err,
            "transition phase advance refused"
        ),
    }
}
