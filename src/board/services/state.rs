//! Shared board state: the task collection plus a change signal.

use crate::board::domain::TaskCollection;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use tokio::sync::watch;

/// Task collection owned by one board session.
///
/// Every accepted mutation bumps a revision counter published on a `watch`
/// channel so renderers learn about changes, including optimistic ones,
/// without polling. Locks are held only for the synchronous body of a
/// mutation and never across a remote call.
#[derive(Debug)]
pub struct BoardState {
    collection: RwLock<TaskCollection>,
    revision: watch::Sender<u64>,
}

impl BoardState {
    /// Wraps a collection at revision zero.
    #[must_use]
    pub fn new(collection: TaskCollection) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            collection: RwLock::new(collection),
            revision,
        }
    }

    /// Runs `f` against the current collection.
    pub fn read<R>(&self, f: impl FnOnce(&TaskCollection) -> R) -> R {
        let guard = self
            .collection
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs a fallible change against the collection.
    ///
    /// The revision is bumped only when `f` succeeds; a guard that refuses
    /// the change stays invisible to subscribers.
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` returns.
    pub fn apply<R, E>(
        &self,
        f: impl FnOnce(&mut TaskCollection) -> Result<R, E>,
    ) -> Result<R, E> {
        let outcome = {
            let mut guard = self.write();
            f(&mut guard)
        };
        if outcome.is_ok() {
            self.bump();
        }
        outcome
    }

    /// Runs an infallible change against the collection.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut TaskCollection) -> R) -> R {
        let outcome = {
            let mut guard = self.write();
            f(&mut guard)
        };
        self.bump();
        outcome
    }

    /// Replaces the whole collection.
    pub fn replace(&self, collection: TaskCollection) {
        self.mutate(|current| *current = collection);
    }

    /// Returns the current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Subscribes to revision changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn write(&self) -> RwLockWriteGuard<'_, TaskCollection> {
        self.collection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}
