//! Then steps for board drag-and-drop BDD scenarios.

use super::world::BoardWorld;
use rstest_bdd_macros::then;
use taskboard::board::{
    adapters::memory::StoreOperation,
    domain::Lane,
    ports::NotificationKind,
};

#[then(r#"task "{title}" is in lane "{lane}" at revision {revision:u64}"#)]
fn task_in_lane(
    world: &BoardWorld,
    title: String,
    lane: String,
    revision: u64,
) -> Result<(), eyre::Report> {
    let expected = Lane::try_from(lane.as_str())
        .map_err(|err| eyre::eyre!("invalid lane in scenario: {err}"))?;
    let board = world.board()?;
    let id = world.task_id(&title)?;
    let task = board
        .task(id)
        .ok_or_else(|| eyre::eyre!("task {title} missing from board"))?;

    if task.lane() != expected || task.revision() != revision {
        return Err(eyre::eyre!(
            "expected {title} in {expected} at revision {revision}, found {} at revision {}",
            task.lane(),
            task.revision()
        ));
    }
    if !board.lane(expected).task_ids().contains(&id) {
        return Err(eyre::eyre!("{title} missing from the {expected} lane view"));
    }
    Ok(())
}

#[then(r#"task "{title}" is in no lane"#)]
fn task_in_no_lane(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let board = world.board()?;
    let listed = board
        .lanes()
        .values()
        .any(|view| view.task_ids().contains(&id));
    if listed || board.task(id).is_some() {
        return Err(eyre::eyre!("{title} should have been removed"));
    }
    Ok(())
}

#[then("no status change was sent")]
fn no_status_change_sent(world: &BoardWorld) -> Result<(), eyre::Report> {
    let calls = world.store.calls()?;
    if calls.contains(&StoreOperation::UpdateTaskStatus) {
        return Err(eyre::eyre!("unexpected status change in {calls:?}"));
    }
    if world.board()?.revision() != 0 {
        return Err(eyre::eyre!("board changed without a status change"));
    }
    Ok(())
}

#[then("no failure is notified")]
fn no_failure_notified(world: &BoardWorld) -> Result<(), eyre::Report> {
    let notifications = world.notifier.notifications();
    if !notifications.is_empty() {
        return Err(eyre::eyre!("unexpected notifications {notifications:?}"));
    }
    Ok(())
}

#[then("a status change failure is notified")]
fn status_failure_notified(world: &BoardWorld) -> Result<(), eyre::Report> {
    expect_notification(world, NotificationKind::TransitionFailure)
}

#[then("a delete failure is notified")]
fn delete_failure_notified(world: &BoardWorld) -> Result<(), eyre::Report> {
    if !matches!(world.last_delete, Some(Err(_))) {
        return Err(eyre::eyre!("delete should have failed"));
    }
    expect_notification(world, NotificationKind::MutationFailure)
}

fn expect_notification(world: &BoardWorld, kind: NotificationKind) -> Result<(), eyre::Report> {
    let kinds: Vec<NotificationKind> = world
        .notifier
        .notifications()
        .iter()
        .map(|notification| notification.kind)
        .collect();
    if kinds != [kind] {
        return Err(eyre::eyre!("expected one {kind:?} notification, got {kinds:?}"));
    }
    Ok(())
}
