//! Tests for object-graph validation through a validator factory.

use crate::engine::{
    config::ValidatorConfig,
    domain::Violations,
    error::ValidationError,
    ports::{
        CheckContext, CheckingUnit, ConstraintValidator, traversable::MockTraversableResolver,
    },
    services::{Validator, ValidatorFactory, ValidatorFactoryBuilder},
};
use crate::metadata::{
    BeanDeclaration, ConstraintAnnotation, ConstraintDefinition, ContainerElementDeclaration,
    DefinitionError, ElementDeclaration, ElementKind, MethodDeclaration, ParameterDeclaration,
    Signature, adapters::constraints,
};
use crate::model::{BeanRef, TypeDecl, TypeName, TypeRef, Value, well_known};
use rstest::{fixture, rstest};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Default)]
struct Unbalanced;

impl ConstraintValidator for Unbalanced {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        value.as_bean().is_none_or(|bean| {
            bean.value_of("left") == bean.value_of("right")
        })
    }
}

fn annotation(constraint: &str) -> ConstraintAnnotation {
    ConstraintAnnotation::new(constraint)
}

fn text() -> ElementDeclaration {
    ElementDeclaration::new(well_known::STRING)
}

fn generic(container: &str, arguments: &[&str]) -> ElementDeclaration {
    ElementDeclaration::new(TypeRef::generic(
        container,
        arguments.iter().copied().map(TypeRef::new),
    ))
}

fn types() -> Vec<TypeDecl> {
    vec![
        TypeDecl::interface("Basic"),
        TypeDecl::interface("Billing"),
        TypeDecl::group_sequence("Ordered", [TypeName::new("Basic"), TypeName::new("Billing")]),
        TypeDecl::interface("Named"),
        TypeDecl::class("Pond"),
        TypeDecl::class("Fish"),
        TypeDecl::class("Person"),
        TypeDecl::class("Address"),
        TypeDecl::class("Robot").implementing("Named"),
        TypeDecl::class("Dog"),
        TypeDecl::class("Animal"),
        TypeDecl::class("Cat").extending("Animal"),
        TypeDecl::class("Scale"),
    ]
}

fn feed_method(amount: ConstraintAnnotation) -> MethodDeclaration {
    MethodDeclaration::new("feed").with_parameter(ParameterDeclaration::new(
        "amount",
        ElementDeclaration::new(well_known::INTEGER).with_constraint(amount),
    ))
}

fn declarations() -> Vec<BeanDeclaration> {
    vec![
        BeanDeclaration::new("Pond")
            .with_field("name", text().with_constraint(annotation(constraints::NOT_NULL)))
            .with_field("fish", ElementDeclaration::new("Fish").cascading())
            .with_field("school", generic(well_known::LIST, &["Fish"]).cascading())
            .with_field(
                "tags",
                generic(well_known::LIST, &[well_known::STRING]).with_container_element(
                    ContainerElementDeclaration::new(0)
                        .with_constraint(annotation(constraints::NOT_BLANK)),
                ),
            )
            .with_field(
                "badges",
                generic(well_known::SET, &[well_known::STRING]).with_container_element(
                    ContainerElementDeclaration::new(0)
                        .with_constraint(annotation(constraints::NOT_BLANK)),
                ),
            )
            .with_field(
                "homes",
                generic(well_known::MAP, &[well_known::STRING, "Address"])
                    .with_container_element(ContainerElementDeclaration::new(1).cascading()),
            )
            .with_field(
                "owners",
                generic(well_known::MAP, &["Address", well_known::INTEGER])
                    .with_container_element(ContainerElementDeclaration::new(0).cascading()),
            )
            .with_field("owner", ElementDeclaration::new("Person").cascading())
            .with_field("keeper", ElementDeclaration::new("Person").cascading()),
        BeanDeclaration::new("Fish").with_field(
            "name",
            text()
                .with_constraint(annotation(constraints::NOT_NULL))
                .with_constraint(annotation(constraints::SIZE).with("min", 2)),
        ),
        BeanDeclaration::new("Person")
            .with_field("name", text().with_constraint(annotation(constraints::NOT_BLANK)))
            .with_field("friend", ElementDeclaration::new("Person").cascading()),
        BeanDeclaration::new("Address")
            .with_field("street", text().with_constraint(annotation(constraints::NOT_NULL))),
        BeanDeclaration::new("Named")
            .with_getter("getName", text().with_constraint(annotation(constraints::NOT_NULL))),
        BeanDeclaration::new("Dog")
            .with_default_group_sequence(["Basic", "Dog"])
            .with_field(
                "breed",
                text().with_constraint(annotation(constraints::NOT_NULL).with_groups(["Basic"])),
            )
            .with_field(
                "age",
                ElementDeclaration::new(well_known::INTEGER)
                    .with_constraint(annotation(constraints::MIN).with("value", 1)),
            )
            .with_field("code", text().with_constraint(annotation("Code")))
            .with_method(
                MethodDeclaration::new("rename")
                    .with_parameter(ParameterDeclaration::new(
                        "name",
                        text().with_constraint(annotation(constraints::NOT_NULL)),
                    ))
                    .returning(text().with_constraint(annotation(constraints::NOT_BLANK))),
            ),
        BeanDeclaration::new("Animal").with_method(feed_method(annotation(constraints::POSITIVE))),
        BeanDeclaration::new("Cat").with_method(feed_method(annotation(constraints::POSITIVE))),
        BeanDeclaration::new("Scale").with_class_constraint(annotation("Balanced")),
    ]
}

fn builder() -> ValidatorFactoryBuilder {
    ValidatorFactory::builder()
        .with_types(types())
        .with_constraint(
            ConstraintDefinition::new("Code", "invalid code")
                .reporting_as_single_violation()
                .composed_of(annotation(constraints::NOT_BLANK))
                .composed_of(annotation(constraints::PATTERN).with("regexp", "[A-Z]+")),
        )
        .with_constraint(ConstraintDefinition::new("Balanced", "unbalanced").validated_by("balanced"))
        .with_checking_unit(CheckingUnit::of::<Unbalanced>("balanced", well_known::OBJECT))
        .with_declarations(declarations())
}

#[fixture]
fn factory() -> ValidatorFactory {
    builder().build().expect("factory should build")
}

#[fixture]
fn validator(factory: ValidatorFactory) -> Validator {
    factory.validator()
}

fn pond() -> BeanRef {
    BeanRef::new("Pond").with("name", "Lake")
}

fn fish(name: Option<&str>) -> Value {
    Value::Bean(BeanRef::new("Fish").with("name", name))
}

fn person(name: &str) -> BeanRef {
    BeanRef::new("Person").with("name", name)
}

fn sorted_paths(violations: &Violations) -> Vec<String> {
    let mut paths = violations.paths();
    paths.sort();
    paths
}

fn validate(validator: &Validator, bean: &BeanRef) -> Violations {
    validator
        .validate(&Value::Bean(bean.clone()), &[])
        .expect("validation should succeed")
}

// ============================================================================
// Bean validation
// ============================================================================

#[rstest]
fn valid_graphs_have_no_violations(validator: Validator) {
    let root = pond().with("fish", fish(Some("Nemo")));

    assert!(validate(&validator, &root).is_empty());
}

#[rstest]
fn cascaded_properties_extend_the_path(validator: Validator) {
    let root = pond().with("fish", fish(None));

    let violations = validate(&validator, &root);

    assert_eq!(violations.paths(), vec!["fish.name".to_owned()]);
    let violation = violations.iter().next().expect("one violation");
    assert_eq!(violation.message(), "must not be null");
    assert!(violation.root_bean().is_some_and(|bean| bean.ptr_eq(&root)));
    assert_eq!(violation.root_bean_type(), &TypeName::new("Pond"));
    assert_eq!(violation.invalid_value(), &Value::Null);
}

#[rstest]
fn list_elements_are_indexed_and_nulls_skipped(validator: Validator) {
    let root = pond().with(
        "school",
        Value::list([Value::Null, fish(Some("Dory")), fish(None)]),
    );

    let violations = validate(&validator, &root);

    assert_eq!(violations.paths(), vec!["school[2].name".to_owned()]);
}

#[rstest]
fn container_element_constraints_apply_to_each_element(validator: Validator) {
    let root = pond().with("tags", Value::list([Value::text("ok"), Value::text(" ")]));

    let violations = validate(&validator, &root);

    assert_eq!(violations.paths(), vec!["tags[1]".to_owned()]);
    let violation = violations.iter().next().expect("one violation");
    assert_eq!(violation.element_kind(), ElementKind::ContainerElement);
    assert_eq!(violation.invalid_value(), &Value::text(" "));
}

#[rstest]
fn every_failing_set_element_is_reported(validator: Validator) {
    let root = pond().with(
        "badges",
        Value::set([Value::text(""), Value::text("gold"), Value::text(" ")]),
    );

    let violations = validate(&validator, &root);

    assert_eq!(violations.len(), 2);
    assert_eq!(violations.paths(), vec!["badges[]".to_owned(), "badges[]".to_owned()]);
    let invalid = violations
        .iter()
        .map(|violation| violation.invalid_value().clone())
        .collect::<Vec<_>>();
    assert_eq!(invalid, vec![Value::text(""), Value::text(" ")]);
}

#[rstest]
fn map_values_are_keyed_and_named_by_type_parameter(validator: Validator) {
    let home = BeanRef::new("Address");
    let root = pond().with("homes", Value::map([(Value::text("main"), Value::Bean(home))]));

    let violations = validate(&validator, &root);

    assert_eq!(violations.paths(), vec!["homes<V>[main].street".to_owned()]);
}

#[rstest]
fn map_keys_can_be_cascaded(validator: Validator) {
    let key = BeanRef::new("Address");
    let root = pond().with("owners", Value::map([(Value::Bean(key.clone()), Value::Int(1))]));

    let violations = validate(&validator, &root);

    let violation = violations.iter().next().expect("one violation");
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violation.property_path().to_string(),
        format!("owners<K>[{key}].street")
    );
    assert!(violation.leaf_bean().is_some_and(|leaf| leaf.ptr_eq(&key)));
}

#[rstest]
fn cycles_terminate(validator: Validator) {
    let first = BeanRef::new("Person").with("name", " ");
    let second = BeanRef::new("Person").with("name", " ");
    first.set("friend", second.clone());
    second.set("friend", first.clone());
    let root = pond().with("owner", first);

    let violations = validate(&validator, &root);

    assert_eq!(
        sorted_paths(&violations),
        vec!["owner.friend.name".to_owned(), "owner.name".to_owned()]
    );
}

#[rstest]
fn self_references_terminate(validator: Validator) {
    let loner = BeanRef::new("Person");
    loner.set("friend", loner.clone());

    let violations = validate(&validator, &loner);

    assert_eq!(violations.paths(), vec!["name".to_owned()]);
}

#[rstest]
fn shared_beans_are_validated_under_each_path(validator: Validator) {
    let shared = BeanRef::new("Person").with("name", "");
    let root = pond().with("owner", shared.clone()).with("keeper", shared.clone());

    let violations = validate(&validator, &root);

    assert_eq!(
        sorted_paths(&violations),
        vec!["keeper.name".to_owned(), "owner.name".to_owned()]
    );
    assert!(
        violations
            .iter()
            .all(|violation| violation.leaf_bean().is_some_and(|leaf| leaf.ptr_eq(&shared)))
    );
}

#[rstest]
fn shared_beans_in_a_cycle_terminate_under_each_path(validator: Validator) {
    let shared = BeanRef::new("Person").with("name", "");
    shared.set("friend", shared.clone());
    let root = pond().with("owner", shared.clone()).with("keeper", shared);

    let violations = validate(&validator, &root);

    assert_eq!(
        sorted_paths(&violations),
        vec!["keeper.name".to_owned(), "owner.name".to_owned()]
    );
}

#[rstest]
fn validation_is_repeatable(validator: Validator) {
    let root = pond()
        .with("fish", fish(Some("x")))
        .with("owner", person(""));

    let first = validate(&validator, &root);
    let second = validate(&validator, &root);

    assert_eq!(first, second);
    assert_eq!(
        sorted_paths(&first),
        vec!["fish.name".to_owned(), "owner.name".to_owned()]
    );
}

#[rstest]
fn messages_are_interpolated_with_attributes(validator: Validator) {
    let root = pond().with("fish", fish(Some("x")));

    let violations = validate(&validator, &root);

    let violation = violations.iter().next().expect("one violation");
    assert_eq!(violation.message(), "size must be between 2 and 2147483647");
    assert_eq!(
        violation.message_template(),
        "size must be between {{ min }} and {{ max }}"
    );
}

#[rstest]
fn class_constraints_report_at_the_bean_path(validator: Validator) {
    let scale = BeanRef::new("Scale").with("left", 1_i64).with("right", 2_i64);

    let violations = validate(&validator, &scale);

    assert_eq!(violations.paths(), vec![String::new()]);
    let violation = violations.iter().next().expect("one violation");
    assert_eq!(violation.element_kind(), ElementKind::Type);
    assert_eq!(violation.message(), "unbalanced");
}

#[rstest]
fn single_violation_constraints_report_once(validator: Validator) {
    let dog = BeanRef::new("Dog")
        .with("breed", "Collie")
        .with("age", 3_i64)
        .with("code", "abc");

    let violations = validate(&validator, &dog);

    assert_eq!(violations.paths(), vec!["code".to_owned()]);
    assert_eq!(
        violations.iter().next().map(|violation| violation.message()),
        Some("invalid code")
    );
}

// ============================================================================
// Groups and sequences
// ============================================================================

#[rstest]
fn redefined_default_sequence_stops_at_the_first_failing_group(validator: Validator) {
    let dog = BeanRef::new("Dog").with("age", 0_i64).with("code", "AB");

    let violations = validate(&validator, &dog);

    assert_eq!(violations.paths(), vec!["breed".to_owned()]);
}

#[rstest]
fn redefined_default_sequence_reaches_later_groups(validator: Validator) {
    let dog = BeanRef::new("Dog")
        .with("breed", "Collie")
        .with("age", 0_i64)
        .with("code", "AB");

    let violations = validate(&validator, &dog);

    assert_eq!(violations.paths(), vec!["age".to_owned()]);
}

#[rstest]
#[case::interface_group(&["Named"], 1)]
#[case::default_group(&[], 1)]
#[case::unrelated_group(&["Billing"], 0)]
fn interface_constraints_join_the_interface_group(
    validator: Validator,
    #[case] groups: &[&str],
    #[case] expected: usize,
) {
    let robot = Value::Bean(BeanRef::new("Robot"));
    let groups = groups.iter().copied().map(TypeName::new).collect::<Vec<_>>();

    let violations = validator
        .validate(&robot, &groups)
        .expect("validation should succeed");

    assert_eq!(violations.len(), expected);
}

#[rstest]
fn requested_sequences_run_their_groups_in_order(validator: Validator) {
    let dog = Value::Bean(BeanRef::new("Dog").with("age", 0_i64));

    let violations = validator
        .validate(&dog, &[TypeName::new("Ordered")])
        .expect("validation should succeed");

    assert_eq!(violations.paths(), vec!["breed".to_owned()]);
}

// ============================================================================
// Configuration and collaborators
// ============================================================================

#[rstest]
fn fail_fast_reports_one_violation(factory: ValidatorFactory) {
    let root = pond()
        .with("name", Value::Null)
        .with("fish", fish(None))
        .with("owner", person(""));
    let validator = factory.validator_with_config(ValidatorConfig::fail_fast());

    let violations = validate(&validator, &root);

    assert_eq!(violations.len(), 1);
}

#[rstest]
#[case::root_only(0, 0)]
#[case::one_level(1, 1)]
fn max_depth_limits_cascades(
    factory: ValidatorFactory,
    #[case] max_depth: usize,
    #[case] expected: usize,
) {
    let root = pond().with("fish", fish(None));
    let validator =
        factory.validator_with_config(ValidatorConfig::default().with_max_depth(max_depth));

    assert_eq!(validate(&validator, &root).len(), expected);
}

#[rstest]
fn untracked_validation_still_terminates_with_a_depth_limit(factory: ValidatorFactory) {
    let loner = BeanRef::new("Person");
    loner.set("friend", loner.clone());
    let validator =
        factory.validator_with_config(ValidatorConfig::untracked().with_max_depth(2));

    let violations = validate(&validator, &loner);

    assert_eq!(
        sorted_paths(&violations),
        vec![
            "friend.friend.name".to_owned(),
            "friend.name".to_owned(),
            "name".to_owned()
        ]
    );
}

#[rstest]
fn traversable_resolver_can_veto_cascades() {
    let mut resolver = MockTraversableResolver::new();
    resolver
        .expect_is_traversable()
        .returning(|_, property, _, _, _| property != "fish");
    let factory = builder()
        .with_traversable_resolver(Arc::new(resolver))
        .build()
        .expect("factory should build");
    let root = pond().with("fish", fish(None)).with("owner", person(""));

    let violations = validate(&factory.validator(), &root);

    assert_eq!(violations.paths(), vec!["owner.name".to_owned()]);
}

#[rstest]
fn metadata_is_built_on_first_use(factory: ValidatorFactory) {
    let pond_type = TypeName::new("Pond");
    assert!(!factory.is_cached(&pond_type));

    validate(&factory.validator(), &pond());

    assert!(factory.is_cached(&pond_type));
}

#[rstest]
#[case::null(Value::Null, ValidationError::NullRoot)]
#[case::not_a_bean(Value::Int(1), ValidationError::NotABean(TypeName::new(well_known::INTEGER)))]
fn roots_must_be_beans(validator: Validator, #[case] root: Value, #[case] expected: ValidationError) {
    assert_eq!(validator.validate(&root, &[]), Err(expected));
}

// ============================================================================
// Property and value validation
// ============================================================================

#[rstest]
#[case::direct("name", Value::Null, vec!["name"])]
#[case::nested("fish.name", fish(None), vec!["fish.name"])]
#[case::indexed("school[1].name", Value::Null, vec!["school[1].name"])]
fn properties_are_validated_by_path(
    validator: Validator,
    #[case] property_path: &str,
    #[case] fish_value: Value,
    #[case] expected: Vec<&str>,
) {
    let root = BeanRef::new("Pond")
        .with("fish", fish_value)
        .with("school", Value::list([fish(Some("Dory")), fish(None)]));

    let violations = validator
        .validate_property(&Value::Bean(root), property_path, &[])
        .expect("validation should succeed");

    assert_eq!(violations.paths(), expected);
}

#[rstest]
fn property_validation_does_not_cascade(validator: Validator) {
    let root = pond().with("fish", fish(None));

    let violations = validator
        .validate_property(&Value::Bean(root), "fish", &[])
        .expect("validation should succeed");

    assert!(violations.is_empty());
}

#[rstest]
fn null_intermediate_properties_yield_nothing(validator: Validator) {
    let violations = validator
        .validate_property(&Value::Bean(pond()), "fish.name", &[])
        .expect("validation should succeed");

    assert!(violations.is_empty());
}

#[rstest]
#[case::unknown_property("colour")]
#[case::unknown_nested("fish.colour")]
#[case::selector_on_leaf("name[0]")]
#[case::malformed("fish..name")]
#[case::through_a_value("name.length")]
fn invalid_property_paths_are_rejected(validator: Validator, #[case] property_path: &str) {
    let root = pond().with("fish", fish(Some("Nemo")));

    let result = validator.validate_property(&Value::Bean(root), property_path, &[]);

    assert_eq!(
        result,
        Err(ValidationError::invalid_path(&TypeName::new("Pond"), property_path))
    );
}

#[rstest]
#[case::direct("name", Value::Null, "name")]
#[case::nested("fish.name", Value::text("x"), "fish.name")]
#[case::element("school[3].name", Value::Null, "school[3].name")]
#[case::map_value("homes[main].street", Value::Null, "homes[main].street")]
fn values_are_validated_against_declared_types(
    validator: Validator,
    #[case] property_path: &str,
    #[case] value: Value,
    #[case] expected: &str,
) {
    let violations = validator
        .validate_value(&TypeName::new("Pond"), property_path, &value, &[])
        .expect("validation should succeed");

    assert_eq!(violations.paths(), vec![expected.to_owned()]);
    assert!(violations.iter().all(|violation| violation.root_bean().is_none()));
}

#[rstest]
fn values_on_unknown_paths_are_rejected(validator: Validator) {
    let result = validator.validate_value(&TypeName::new("Pond"), "fish.fins", &Value::Int(2), &[]);

    assert!(matches!(result, Err(ValidationError::InvalidPropertyPath { .. })));
}

// ============================================================================
// Method validation
// ============================================================================

fn rename() -> Signature {
    Signature::new("rename", [TypeName::new(well_known::STRING)])
}

fn dog() -> Value {
    Value::Bean(BeanRef::new("Dog").with("breed", "Collie").with("age", 3_i64))
}

#[rstest]
fn parameters_are_validated_with_method_paths(validator: Validator) {
    let violations = validator
        .validate_parameters(&dog(), &rename(), &[Value::Null], &[])
        .expect("validation should succeed");

    assert_eq!(violations.paths(), vec!["rename.name".to_owned()]);
    let violation = violations.iter().next().expect("one violation");
    assert_eq!(violation.element_kind(), ElementKind::Parameter);
}

#[rstest]
fn return_values_are_validated(validator: Validator) {
    let violations = validator
        .validate_return_value(&dog(), &rename(), &Value::text(" "), &[])
        .expect("validation should succeed");

    assert_eq!(violations.paths(), vec!["rename.<return value>".to_owned()]);
}

#[rstest]
fn argument_count_must_match(validator: Validator) {
    let result = validator.validate_parameters(&dog(), &rename(), &[], &[]);

    assert_eq!(
        result,
        Err(ValidationError::ParameterCount {
            method: "rename(String)".to_owned(),
            expected: 1,
            given: 0,
        })
    );
}

#[rstest]
fn unknown_methods_are_unconstrained(validator: Validator) {
    let violations = validator
        .validate_parameters(&dog(), &Signature::new("bark", []), &[], &[])
        .expect("validation should succeed");

    assert!(violations.is_empty());
}

#[rstest]
fn strengthened_overrides_fail_when_validated(validator: Validator) {
    let cat = Value::Bean(BeanRef::new("Cat"));
    let feed = Signature::new("feed", [TypeName::new(well_known::INTEGER)]);

    let result = validator.validate_parameters(&cat, &feed, &[Value::Int(1)], &[]);

    assert!(matches!(
        result,
        Err(ValidationError::Definition(
            DefinitionError::ParameterConstraintsStrengthened { .. }
        ))
    ));
}

// ============================================================================
// Descriptors
// ============================================================================

#[rstest]
fn descriptors_expose_declared_constraints(validator: Validator) {
    let descriptor = validator
        .constraints_for(&TypeName::new("Pond"))
        .expect("descriptor should build");

    assert!(descriptor.is_bean_constrained());
    assert!(descriptor.constraints_for_property("name").is_some());
}
