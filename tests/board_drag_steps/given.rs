//! Given steps for board drag-and-drop BDD scenarios.

use super::world::BoardWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::{
    adapters::memory::StoreOperation,
    domain::{Lane, TaskFields},
};

#[given(r#"a board with task "{first}" in "{first_lane}" and task "{second}" in "{second_lane}""#)]
fn board_with_two_tasks(
    world: &mut BoardWorld,
    first: String,
    first_lane: String,
    second: String,
    second_lane: String,
) -> Result<(), eyre::Report> {
    for (title, lane) in [(first, first_lane), (second, second_lane)] {
        let parsed = Lane::try_from(lane.as_str())
            .map_err(|err| eyre::eyre!("invalid lane in scenario: {err}"))?;
        let task = world
            .store
            .seed_task(&TaskFields::new(title.as_str())?.with_lane(parsed))
            .wrap_err("seed task for drag scenario")?;
        world.tasks_by_title.insert(title, task.id());
    }
    world.load_board()
}

#[given("the store rejects the next status change")]
fn store_rejects_status_change(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world
        .store
        .fail_next(StoreOperation::UpdateTaskStatus, 1)
        .wrap_err("inject status change fault")
}

#[given("the store rejects the next delete")]
fn store_rejects_delete(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world
        .store
        .fail_next(StoreOperation::DeleteTask, 1)
        .wrap_err("inject delete fault")
}
