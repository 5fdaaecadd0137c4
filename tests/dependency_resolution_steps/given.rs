//! Given steps for dependency resolution BDD scenarios.

use super::world::ResolutionWorld;
use renewal_desk::task::domain::{DependencyRef, TaskKind, TaskStatus, TemplateId};
use rstest_bdd_macros::given;

fn parse_status(status: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(status).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

#[given(r#"a manual task "{label}" that is "{status}""#)]
fn manual_task(
    world: &mut ResolutionWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parsed = parse_status(&status)?;
    world.add_task(label, TaskKind::Manual, parsed);
    Ok(())
}

#[given(r#"an automated task "{label}" that is "{status}""#)]
fn automated_task(
    world: &mut ResolutionWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parsed = parse_status(&status)?;
    world.add_task(label, TaskKind::Automated, parsed);
    Ok(())
}

#[given(r#"task "{label}" depends on task "{dependency}""#)]
fn depends_on_task(
    world: &mut ResolutionWorld,
    label: String,
    dependency: String,
) -> Result<(), eyre::Report> {
    let dependency_id = world.id_of(&dependency)?;
    world
        .pending_mut(&label)?
        .dependencies
        .push(DependencyRef::from(dependency_id));
    Ok(())
}

#[given(r#"task "{label}" depends on template reference {reference:u64}"#)]
fn depends_on_template(
    world: &mut ResolutionWorld,
    label: String,
    reference: u64,
) -> Result<(), eyre::Report> {
    world
        .pending_mut(&label)?
        .dependencies
        .push(DependencyRef::from(reference));
    Ok(())
}

#[given(r#"task "{label}" has template id "{template}""#)]
fn has_template_id(
    world: &mut ResolutionWorld,
    label: String,
    template: String,
) -> Result<(), eyre::Report> {
    world.pending_mut(&label)?.template_id = Some(TemplateId::new(template));
    Ok(())
}

#[given(r#"task "{label}" belongs to another company"#)]
fn belongs_to_other_company(
    world: &mut ResolutionWorld,
    label: String,
) -> Result<(), eyre::Report> {
    let other = world.other_company_id;
    world.pending_mut(&label)?.company_id = other;
    Ok(())
}
