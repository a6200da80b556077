//! Then steps for object-graph validation BDD scenarios.

use super::world::GraphValidationWorld;
use rstest_bdd_macros::then;
use vauban::engine::{ValidationError, Violations};

fn violations(world: &GraphValidationWorld) -> Result<&Violations, eyre::Report> {
    match world.outcome.as_ref() {
        Some(Ok(violations)) => Ok(violations),
        Some(Err(error)) => Err(eyre::eyre!("validation failed unexpectedly: {error}")),
        None => Err(eyre::eyre!("missing validation outcome")),
    }
}

#[then("the number of violations is {count:usize}")]
fn violation_count(world: &GraphValidationWorld, count: usize) -> Result<(), eyre::Report> {
    let found = violations(world)?;
    if found.len() != count {
        return Err(eyre::eyre!(
            "expected {count} violations, found {}: {:?}",
            found.len(),
            found.paths()
        ));
    }
    Ok(())
}

#[then(r#"a violation at "{path}" reads "{message}""#)]
fn violation_at(
    world: &GraphValidationWorld,
    path: String,
    message: String,
) -> Result<(), eyre::Report> {
    let found = violations(world)?;
    if !found.at_path(&path).any(|violation| violation.message() == message) {
        return Err(eyre::eyre!(
            "no violation at {path} reading {message:?}; found paths {:?}",
            found.paths()
        ));
    }
    Ok(())
}

#[then(r#"{count:usize} violations at "{path}" read "{message}""#)]
fn violations_at(
    world: &GraphValidationWorld,
    count: usize,
    path: String,
    message: String,
) -> Result<(), eyre::Report> {
    let found = violations(world)?;
    let matching = found
        .at_path(&path)
        .filter(|violation| violation.message() == message)
        .count();
    if matching != count {
        return Err(eyre::eyre!(
            "expected {count} violations at {path} reading {message:?}, found {matching}"
        ));
    }
    Ok(())
}

#[then("validation fails with an invalid property path")]
fn fails_with_invalid_path(world: &GraphValidationWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing validation outcome"))?;
    if !matches!(outcome, Err(ValidationError::InvalidPropertyPath { .. })) {
        return Err(eyre::eyre!(
            "expected an invalid property path error, got {outcome:?}"
        ));
    }
    Ok(())
}
