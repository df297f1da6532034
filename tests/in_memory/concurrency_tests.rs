//! In-memory integration tests for optimistic transitions in flight.

use super::helpers::{GatedStore, Seeded, lane_of, load_board, notifier, seeded_store};
use eyre::ensure;
use rstest::rstest;
use taskboard::board::{
    adapters::memory::{InMemoryTaskStore, RecordingNotifier, StoreOperation},
    domain::{DroppableId, Lane, TransitionPhase},
    ports::{NotificationKind, TaskStoreError},
    services::{BoardConfig, ConcurrencyPolicy, SkipReason, TransitionOutcome},
};

fn policy(concurrency: ConcurrencyPolicy) -> BoardConfig {
    BoardConfig {
        concurrency,
        ..BoardConfig::default()
    }
}

fn lane(target: Lane) -> Option<DroppableId> {
    Some(DroppableId::from(target))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_is_visible_before_the_store_answers(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let board = load_board(gated.clone(), &notifier, BoardConfig::default()).await;
    let changes = board.subscribe();

    let drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let observe = async {
        gated.wait_arrived(1).await;
        let seen = (
            lane_of(&board, seeded.t1),
            board.phase_of(seeded.t1),
            changes.has_changed().unwrap_or(false),
        );
        gated.release(0);
        seen
    };
    let (outcome, (seen_lane, seen_phase, signalled)) = tokio::join!(drag, observe);

    ensure!(seen_lane == Some(Lane::InProgress), "optimistic lane visible");
    ensure!(seen_phase == TransitionPhase::Reconciling, "request in flight");
    ensure!(signalled, "subscribers notified of the optimistic change");
    ensure!(outcome.committed().is_some(), "move commits once released");
    ensure!(
        board.phase_of(seeded.t1) == TransitionPhase::Idle,
        "settled transitions leave no trace"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn latest_intent_wins_discards_stale_response(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let config = policy(ConcurrencyPolicy::LatestIntentWins);
    let board = load_board(gated.clone(), &notifier, config).await;

    let first_drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let second_drag = async {
        gated.wait_arrived(1).await;
        board.on_drag_end(seeded.t1, lane(Lane::Done)).await
    };
    let releaser = async {
        gated.wait_arrived(2).await;
        gated.release(0);
        gated.wait_completed(1).await;
        gated.release(1);
    };
    let (first, second, ()) = tokio::join!(first_drag, second_drag, releaser);

    ensure!(second.committed().is_some(), "newest drag commits");
    ensure!(
        matches!(first, TransitionOutcome::Superseded { cause: None, .. }),
        "stale response discarded, got {first:?}"
    );
    ensure!(lane_of(&board, seeded.t1) == Some(Lane::Done), "newest intent shown");
    ensure!(
        gated.inner().task(seeded.t1)?.map(|task| task.lane()) == Some(Lane::Done),
        "store agrees with the board"
    );
    ensure!(notifier.notifications().is_empty(), "nothing to report");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_response_wins_applies_late_response(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let board = load_board(gated.clone(), &notifier, BoardConfig::faithful()).await;

    let first_drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let second_drag = async {
        gated.wait_arrived(1).await;
        board.on_drag_end(seeded.t1, lane(Lane::Done)).await
    };
    let releaser = async {
        gated.wait_arrived(2).await;
        gated.release(1);
        gated.wait_completed(1).await;
        gated.release(0);
    };
    let (first, second, ()) = tokio::join!(first_drag, second_drag, releaser);

    ensure!(second.committed().is_some(), "second drag commits first");
    ensure!(first.committed().is_some(), "late response still commits");
    ensure!(
        lane_of(&board, seeded.t1) == Some(Lane::InProgress),
        "late response overwrites the newer lane"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn superseded_failure_is_reported_without_rollback(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let board = load_board(gated.clone(), &notifier, BoardConfig::default()).await;

    let first_drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let second_drag = async {
        gated.wait_arrived(1).await;
        board.on_drag_end(seeded.t1, lane(Lane::Done)).await
    };
    let releaser = async {
        gated.wait_arrived(2).await;
        gated
            .inner()
            .fail_next(StoreOperation::UpdateTaskStatus, 1)
            .expect("inject fault");
        gated.release(0);
        gated.wait_completed(1).await;
        gated.release(1);
    };
    let (first, second, ()) = tokio::join!(first_drag, second_drag, releaser);

    ensure!(
        matches!(first, TransitionOutcome::Superseded { cause: Some(_), .. }),
        "stale failure discarded, got {first:?}"
    );
    ensure!(second.committed().is_some(), "newest drag commits");
    ensure!(lane_of(&board, seeded.t1) == Some(Lane::Done), "no rollback");
    let kinds: Vec<NotificationKind> = notifier
        .notifications()
        .iter()
        .map(|notification| notification.kind)
        .collect();
    ensure!(
        kinds == [NotificationKind::TransitionFailure],
        "stale failure still reported, got {kinds:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn serialize_per_task_refuses_second_drag(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let config = policy(ConcurrencyPolicy::SerializePerTask);
    let board = load_board(gated.clone(), &notifier, config).await;

    let first_drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let second_drag = async {
        gated.wait_arrived(1).await;
        let refused = board.on_drag_end(seeded.t1, lane(Lane::Done)).await;
        let other_drag = board.on_drag_end(seeded.t2, lane(Lane::Todo));
        let releaser = async {
            gated.wait_arrived(2).await;
            gated.release(1);
            gated.release(0);
        };
        let (other, ()) = tokio::join!(other_drag, releaser);
        (refused, other)
    };
    let (first, (refused, other)) = tokio::join!(first_drag, second_drag);

    ensure!(
        matches!(refused, TransitionOutcome::Skipped(SkipReason::InFlight)),
        "second drag refused, got {refused:?}"
    );
    ensure!(other.committed().is_some(), "other tasks are not blocked");
    ensure!(first.committed().is_some(), "first drag completes");
    ensure!(gated.arrived() == 2, "refused drag sends nothing");
    ensure!(
        lane_of(&board, seeded.t1) == Some(Lane::InProgress),
        "first drag's lane kept"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_drag_restores_lane_and_frees_task(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let config = policy(ConcurrencyPolicy::SerializePerTask);
    let board = load_board(gated.clone(), &notifier, config).await;

    tokio::select! {
        outcome = board.on_drag_end(seeded.t1, lane(Lane::InProgress)) => {
            eyre::bail!("drag settled while its request was held: {outcome:?}");
        }
        () = gated.wait_arrived(1) => {}
    }

    ensure!(
        board.phase_of(seeded.t1) == TransitionPhase::Idle,
        "cancelled drag leaves no in-flight entry"
    );
    ensure!(lane_of(&board, seeded.t1) == Some(Lane::Todo), "prior lane restored");

    let retry = board.on_drag_end(seeded.t1, lane(Lane::Done));
    let releaser = async {
        gated.wait_arrived(2).await;
        gated.release(1);
    };
    let (outcome, ()) = tokio::join!(retry, releaser);

    ensure!(outcome.committed().is_some(), "next drag goes through, got {outcome:?}");
    ensure!(lane_of(&board, seeded.t1) == Some(Lane::Done), "next drag applied");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn superseded_success_becomes_rollback_base(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let board = load_board(gated.clone(), &notifier, BoardConfig::default()).await;

    let first_drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let second_drag = async {
        gated.wait_arrived(1).await;
        board.on_drag_end(seeded.t1, lane(Lane::Done)).await
    };
    let releaser = async {
        gated.wait_arrived(2).await;
        gated.release(0);
        gated.wait_completed(1).await;
        gated
            .inner()
            .fail_next(StoreOperation::UpdateTaskStatus, 1)
            .expect("inject fault");
        gated.release(1);
    };
    let (first, second, ()) = tokio::join!(first_drag, second_drag, releaser);

    ensure!(
        matches!(first, TransitionOutcome::Superseded { cause: None, .. }),
        "first response superseded, got {first:?}"
    );
    ensure!(
        matches!(
            second,
            TransitionOutcome::RolledBack {
                restored_lane: Lane::InProgress,
                ..
            }
        ),
        "second drag rolled back, got {second:?}"
    );
    let remote = gated.inner().task(seeded.t1)?;
    ensure!(remote.as_ref().map(|task| task.revision()) == Some(2), "store moved once");
    ensure!(
        board.task(seeded.t1) == remote,
        "board matches the store record after rollback"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unanswered_request_times_out_and_rolls_back(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let config = BoardConfig {
        remote_timeout_ms: Some(50),
        ..BoardConfig::default()
    };
    let board = load_board(gated.clone(), &notifier, config).await;

    let outcome = board.on_drag_end(seeded.t1, lane(Lane::Done)).await;

    ensure!(
        matches!(
            outcome,
            TransitionOutcome::RolledBack {
                cause: TaskStoreError::Timeout(_),
                restored_lane: Lane::Todo,
                ..
            }
        ),
        "expected timeout rollback, got {outcome:?}"
    );
    ensure!(lane_of(&board, seeded.t1) == Some(Lane::Todo), "T1 restored");
    ensure!(
        notifier.last().map(|n| n.kind) == Some(NotificationKind::TransitionFailure),
        "timeout reported"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_deleted_mid_flight_is_not_resurrected(
    seeded_store: (InMemoryTaskStore, Seeded),
    notifier: RecordingNotifier,
) -> eyre::Result<()> {
    let (store, seeded) = seeded_store;
    let gated = GatedStore::new(store);
    let board = load_board(gated.clone(), &notifier, BoardConfig::default()).await;

    let drag = board.on_drag_end(seeded.t1, lane(Lane::InProgress));
    let delete = async {
        gated.wait_arrived(1).await;
        let deleted = board.on_delete(seeded.t1).await;
        gated.release(0);
        deleted
    };
    let (outcome, deleted) = tokio::join!(drag, delete);

    ensure!(deleted.is_ok(), "delete succeeds");
    ensure!(
        matches!(outcome, TransitionOutcome::Vanished { task_id } if task_id == seeded.t1),
        "response discarded, got {outcome:?}"
    );
    ensure!(board.task(seeded.t1).is_none(), "T1 stays deleted");
    ensure!(
        board.lanes().values().all(|view| !view.task_ids().contains(&seeded.t1)),
        "T1 in no lane"
    );
    Ok(())
}
