//! Then steps for dependency resolution BDD scenarios.

use std::time::Duration;

use super::world::{ResolutionWorld, run_async};
use renewal_desk::task::{domain::TaskStatus, ports::TaskRepository};
use rstest_bdd_macros::then;

#[then(r#"the status of task "{label}" is "{status}""#)]
fn status_of_task_is(
    world: &ResolutionWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.id_of(&label)?;
    let task = run_async(world.repository.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {label} was not stored"))?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected task {label} to be {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then("{count:usize} automation signals were sent")]
fn automation_signals_sent(world: &ResolutionWorld, count: usize) -> Result<(), eyre::Report> {
    let sent = run_async(world.trigger.wait_for(count, Duration::from_secs(2)))?.len();
    if sent != count {
        return Err(eyre::eyre!("expected {count} automation signals, found {sent}"));
    }
    Ok(())
}
