//! When steps for dependency resolution BDD scenarios.

use super::world::{ResolutionWorld, run_async};
use eyre::WrapErr;
use renewal_desk::task::services::UpdateTaskStatusRequest;
use rstest_bdd_macros::when;

#[when(r#"task "{label}" is marked "{status}""#)]
fn task_is_marked(
    world: &mut ResolutionWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.persist_pending()?;
    let task_id = world.id_of(&label)?;
    run_async(
        world
            .service
            .update_status(UpdateTaskStatusRequest::new(task_id, status)),
    )
    .wrap_err("update task status in scenario")?;
    Ok(())
}

