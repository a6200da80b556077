//! Behavioural tests for method parameter and return value validation.

use eyre::{Result, eyre};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use vauban::engine::{ValidationError, ValidationResult, Validator, ValidatorFactory, Violations};
use vauban::metadata::{
    BeanDeclaration, ConstraintAnnotation, DefinitionError, ElementDeclaration,
    MethodDeclaration, ParameterDeclaration, Signature, adapters::constraints,
};
use vauban::model::{BeanRef, TypeDecl, Value, well_known};

#[derive(Default)]
struct MethodWorld {
    validator: Option<Validator>,
    outcome: Option<ValidationResult<Violations>>,
}

#[fixture]
fn world() -> MethodWorld {
    MethodWorld::default()
}

fn text_with(constraint: &str) -> ElementDeclaration {
    ElementDeclaration::new(well_known::STRING).with_constraint(ConstraintAnnotation::new(constraint))
}

fn feed() -> MethodDeclaration {
    MethodDeclaration::new("feed").with_parameter(ParameterDeclaration::new(
        "amount",
        ElementDeclaration::new(well_known::INTEGER)
            .with_constraint(ConstraintAnnotation::new(constraints::POSITIVE)),
    ))
}

fn rename() -> Signature {
    Signature::new("rename", [well_known::STRING.into()])
}

fn dog() -> Value {
    Value::Bean(BeanRef::new("Dog"))
}

fn validator(world: &MethodWorld) -> Result<&Validator> {
    world
        .validator
        .as_ref()
        .ok_or_else(|| eyre!("missing validator in scenario world"))
}

#[given("a validator for the dog catalogue")]
fn dog_catalogue(world: &mut MethodWorld) -> Result<()> {
    let factory = ValidatorFactory::builder()
        .with_types([
            TypeDecl::class("Dog"),
            TypeDecl::class("Animal"),
            TypeDecl::class("Cat").extending("Animal"),
        ])
        .with_declarations([
            BeanDeclaration::new("Dog").with_method(
                MethodDeclaration::new("rename")
                    .with_parameter(ParameterDeclaration::new(
                        "name",
                        text_with(constraints::NOT_NULL),
                    ))
                    .returning(text_with(constraints::NOT_BLANK)),
            ),
            BeanDeclaration::new("Animal").with_method(feed()),
            BeanDeclaration::new("Cat").with_method(feed()),
        ])
        .build()?;
    world.validator = Some(factory.validator());
    Ok(())
}

#[when("rename is called with no name")]
fn rename_with_null(world: &mut MethodWorld) -> Result<()> {
    let outcome = validator(world)?.validate_parameters(&dog(), &rename(), &[Value::Null], &[]);
    world.outcome = Some(outcome);
    Ok(())
}

#[when("rename returns a blank name")]
fn rename_returns_blank(world: &mut MethodWorld) -> Result<()> {
    let outcome =
        validator(world)?.validate_return_value(&dog(), &rename(), &Value::text("  "), &[]);
    world.outcome = Some(outcome);
    Ok(())
}

#[when("rename is called without arguments")]
fn rename_without_arguments(world: &mut MethodWorld) -> Result<()> {
    let outcome = validator(world)?.validate_parameters(&dog(), &rename(), &[], &[]);
    world.outcome = Some(outcome);
    Ok(())
}

#[when("a cat is fed a negative amount")]
fn feed_cat(world: &mut MethodWorld) -> Result<()> {
    let cat = Value::Bean(BeanRef::new("Cat"));
    let signature = Signature::new("feed", [well_known::INTEGER.into()]);
    let outcome = validator(world)?.validate_parameters(&cat, &signature, &[Value::Int(-1)], &[]);
    world.outcome = Some(outcome);
    Ok(())
}

#[then(r#"a violation is reported at "{path}""#)]
fn violation_at(world: &MethodWorld, path: String) -> Result<()> {
    match world.outcome.as_ref() {
        Some(Ok(violations)) if violations.paths() == vec![path.clone()] => Ok(()),
        other => Err(eyre!("expected a single violation at {path}, got {other:?}")),
    }
}

#[then("the call is rejected for its argument count")]
fn rejected_for_argument_count(world: &MethodWorld) -> Result<()> {
    match world.outcome.as_ref() {
        Some(Err(ValidationError::ParameterCount { expected: 1, given: 0, .. })) => Ok(()),
        other => Err(eyre!("expected a parameter count error, got {other:?}")),
    }
}

#[then("the call is rejected as a definition error")]
fn rejected_as_definition_error(world: &MethodWorld) -> Result<()> {
    match world.outcome.as_ref() {
        Some(Err(ValidationError::Definition(
            DefinitionError::ParameterConstraintsStrengthened { .. },
        ))) => Ok(()),
        other => Err(eyre!("expected strengthened parameter constraints, got {other:?}")),
    }
}

#[scenario(
    path = "tests/features/method_validation.feature",
    name = "A null argument is reported at the parameter"
)]
fn null_argument_reported(world: MethodWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/method_validation.feature",
    name = "A blank return value is reported"
)]
fn blank_return_value_reported(world: MethodWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/method_validation.feature",
    name = "Too few arguments are rejected"
)]
fn too_few_arguments_rejected(world: MethodWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/method_validation.feature",
    name = "Strengthened parameter constraints are rejected"
)]
fn strengthened_parameters_rejected(world: MethodWorld) {
    let _ = world;
}
