//! When steps for object-graph validation BDD scenarios.

use super::world::GraphValidationWorld;
use rstest_bdd_macros::when;
use vauban::engine::Validator;
use vauban::model::{BeanRef, Value};

fn validator(world: &GraphValidationWorld) -> Result<Validator, eyre::Report> {
    world
        .factory
        .as_ref()
        .map(|factory| factory.validator_with_config(world.config))
        .ok_or_else(|| eyre::eyre!("missing validator factory in scenario world"))
}

fn root(bean: Option<&BeanRef>, label: &str) -> Result<Value, eyre::Report> {
    bean.cloned()
        .map(Value::Bean)
        .ok_or_else(|| eyre::eyre!("missing {label} in scenario world"))
}

#[when("the pond is validated")]
fn validate_pond(world: &mut GraphValidationWorld) -> Result<(), eyre::Report> {
    let pond = root(world.pond.as_ref(), "pond")?;
    world.outcome = Some(validator(world)?.validate(&pond, &[]));
    Ok(())
}

#[when("the kennel is validated")]
fn validate_kennel(world: &mut GraphValidationWorld) -> Result<(), eyre::Report> {
    let kennel = root(world.kennel.as_ref(), "kennel")?;
    world.outcome = Some(validator(world)?.validate(&kennel, &[]));
    Ok(())
}

#[when(r#"the property "{path}" of the pond is validated"#)]
fn validate_pond_property(
    world: &mut GraphValidationWorld,
    path: String,
) -> Result<(), eyre::Report> {
    let pond = root(world.pond.as_ref(), "pond")?;
    world.outcome = Some(validator(world)?.validate_property(&pond, &path, &[]));
    Ok(())
}
