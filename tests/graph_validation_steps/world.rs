//! Shared world state for object-graph validation BDD scenarios.

use rstest::fixture;
use vauban::engine::{ValidationResult, ValidatorConfig, ValidatorFactory, Violations};
use vauban::metadata::{
    BeanDeclaration, ConstraintAnnotation, ContainerElementDeclaration, ElementDeclaration,
    adapters::constraints,
};
use vauban::model::{BeanRef, TypeDecl, TypeRef, well_known};

/// Scenario world for graph validation behaviour tests.
#[derive(Default)]
pub struct GraphValidationWorld {
    pub factory: Option<ValidatorFactory>,
    pub config: ValidatorConfig,
    pub pond: Option<BeanRef>,
    pub kennel: Option<BeanRef>,
    pub outcome: Option<ValidationResult<Violations>>,
}

impl GraphValidationWorld {
    /// Returns the pond under test, creating an empty one on first use.
    pub fn pond(&mut self) -> &BeanRef {
        self.pond.get_or_insert_with(|| BeanRef::new("Pond"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> GraphValidationWorld {
    GraphValidationWorld::default()
}

fn text() -> ElementDeclaration {
    ElementDeclaration::new(well_known::STRING)
}

fn not_null() -> ConstraintAnnotation {
    ConstraintAnnotation::new(constraints::NOT_NULL)
}

/// Builds the factory shared by the scenarios.
pub fn aquarium() -> ValidationResult<ValidatorFactory> {
    ValidatorFactory::builder()
        .with_types([
            TypeDecl::interface("Identity"),
            TypeDecl::class("Pond"),
            TypeDecl::class("Fish"),
            TypeDecl::class("Keeper"),
            TypeDecl::class("Kennel"),
        ])
        .with_declarations([
            BeanDeclaration::new("Pond")
                .with_field("fish", ElementDeclaration::new("Fish").cascading())
                .with_field(
                    "labels",
                    ElementDeclaration::new(TypeRef::generic(
                        well_known::LIST,
                        [TypeRef::new(well_known::STRING)],
                    ))
                    .with_container_element(
                        ContainerElementDeclaration::new(0).with_constraint(not_null()),
                    ),
                )
                .with_field(
                    "badges",
                    ElementDeclaration::new(TypeRef::generic(
                        well_known::SET,
                        [TypeRef::new(well_known::STRING)],
                    ))
                    .with_container_element(
                        ContainerElementDeclaration::new(0)
                            .with_constraint(ConstraintAnnotation::new(constraints::NOT_BLANK)),
                    ),
                )
                .with_field("keeper", ElementDeclaration::new("Keeper").cascading())
                .with_field("warden", ElementDeclaration::new("Keeper").cascading()),
            BeanDeclaration::new("Fish").with_field("name", text().with_constraint(not_null())),
            BeanDeclaration::new("Keeper")
                .with_field(
                    "name",
                    text().with_constraint(ConstraintAnnotation::new(constraints::NOT_BLANK)),
                )
                .with_field("partner", ElementDeclaration::new("Keeper").cascading()),
            BeanDeclaration::new("Kennel")
                .with_default_group_sequence(["Identity", "Kennel"])
                .with_field(
                    "licence",
                    text().with_constraint(not_null().with_groups(["Identity"])),
                )
                .with_field(
                    "capacity",
                    ElementDeclaration::new(well_known::INTEGER).with_constraint(
                        ConstraintAnnotation::new(constraints::MIN).with("value", 1),
                    ),
                ),
        ])
        .build()
}
