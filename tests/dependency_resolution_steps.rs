//! Behaviour tests for dependency resolution after task completion.

#[path = "dependency_resolution_steps/mod.rs"]
mod dependency_resolution_steps_defs;

use dependency_resolution_steps_defs::world::{ResolutionWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/dependency_resolution.feature",
    name = "Completing a task unblocks only its direct dependents"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completion_unblocks_direct_dependents(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dependency_resolution.feature",
    name = "A queued automated task satisfies its dependents"
)]
#[tokio::test(flavor = "multi_thread")]
async fn queued_automated_task_satisfies_dependents(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dependency_resolution.feature",
    name = "Numeric template references resolve against string template ids"
)]
#[tokio::test(flavor = "multi_thread")]
async fn numeric_template_references_resolve(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dependency_resolution.feature",
    name = "Completion never touches another company"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completion_is_scoped_to_one_company(world: ResolutionWorld) {
    let _ = world;
}
