//! Behaviour tests for object-graph validation.

#[path = "graph_validation_steps/mod.rs"]
mod graph_validation_steps_defs;

use graph_validation_steps_defs::world::{GraphValidationWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "A cascaded bean reports its nested path"
)]
fn cascaded_bean_reports_nested_path(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "Null list elements are reported by index"
)]
fn null_list_elements_reported_by_index(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "Every blank element of a set is reported"
)]
fn blank_set_elements_reported(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "A keeper in two roles is reported under each path"
)]
fn shared_keeper_reported_under_each_path(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "Keepers referencing each other are validated once"
)]
fn cyclic_keepers_validated_once(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "A redefined default sequence stops at the first failing group"
)]
fn default_sequence_stops_at_failing_group(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "The bean's own constraints run once the sequence passes"
)]
fn default_sequence_reaches_own_constraints(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "A fail-fast validator stops at the first violation"
)]
fn fail_fast_validator_stops_early(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "A single property is validated without cascading"
)]
fn single_property_validation(world: GraphValidationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/graph_validation.feature",
    name = "An unknown property path is rejected"
)]
fn unknown_property_path_rejected(world: GraphValidationWorld) {
    let _ = world;
}
