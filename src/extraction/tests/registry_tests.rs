//! Tests for extractor registration and maximally specific resolution.

use crate::extraction::{
    ExtractionError, ExtractorDeclaration, ExtractorTypeArgument, ValueExtractorRegistry,
    adapters::IterableElementExtractor,
};
use crate::model::{
    ContainerContent, SuperType, TypeDecl, TypeName, TypeRef, TypeSystem, Value, well_known,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

use ExtractorTypeArgument::{Bounded, ExtractedBounded, ExtractedWildcard, Wildcard};

// ============================================================================
// Fixtures
// ============================================================================

fn single_parameter(name: &str) -> TypeDecl {
    TypeDecl::interface(name).with_type_parameters(["T"])
}

fn child_of(name: &str, parents: &[&str]) -> TypeDecl {
    parents.iter().fold(
        TypeDecl::class(name).with_type_parameters(["T"]),
        |declaration, parent| {
            declaration.implementing(SuperType::new(*parent).with_variable("T"))
        },
    )
}

#[fixture]
fn type_system() -> Arc<TypeSystem> {
    let declarations = [
        single_parameter("Bag"),
        single_parameter("Crate"),
        child_of("BagCrate", &["Bag", "Crate"]),
        single_parameter("Box"),
        child_of("LeftBox", &["Box"]),
        child_of("RightBox", &["Box"]),
        child_of("TwinBox", &["LeftBox", "RightBox"]),
        TypeDecl::class("Pair").with_type_parameters(["A", "B"]),
    ];
    let mut types = TypeSystem::new();
    for declaration in declarations {
        types.register(declaration).expect("fixture type should register");
    }
    Arc::new(types)
}

#[fixture]
fn registry(type_system: Arc<TypeSystem>) -> ValueExtractorRegistry {
    ValueExtractorRegistry::new(type_system).expect("built-in extractors should register")
}

fn declaration(name: &str, container: &str) -> ExtractorDeclaration {
    ExtractorDeclaration::new(name, container, Arc::new(IterableElementExtractor))
}

fn resolved_name(
    registry: &ValueExtractorRegistry,
    declared: &str,
    slot: usize,
    runtime: &str,
) -> Option<String> {
    registry
        .resolve(&TypeName::new(declared), slot, &TypeName::new(runtime))
        .expect("resolution should succeed")
        .map(|descriptor| descriptor.name().to_owned())
}

// ============================================================================
// Declaration checks
// ============================================================================

#[rstest]
fn bounded_type_arguments_are_rejected(mut registry: ValueExtractorRegistry) {
    let result = registry.register(
        declaration("BoundedBag", "Bag").with_type_argument(ExtractedBounded(TypeRef::new("Animal"))),
    );
    assert!(matches!(result, Err(ExtractionError::BoundedTypeArgument { .. })));
}

#[rstest]
fn bounded_non_extracted_arguments_are_rejected(mut registry: ValueExtractorRegistry) {
    let result = registry.register(
        declaration("PairFirst", "Pair")
            .with_type_argument(ExtractedWildcard)
            .with_type_argument(Bounded(TypeRef::new("Animal"))),
    );
    assert!(matches!(result, Err(ExtractionError::BoundedTypeArgument { .. })));
}

#[rstest]
fn a_missing_extracted_marker_is_rejected(mut registry: ValueExtractorRegistry) {
    let result = registry.register(declaration("Nothing", "Bag").with_type_argument(Wildcard));
    assert!(matches!(result, Err(ExtractionError::MissingExtractedValue { .. })));
}

#[rstest]
fn two_extracted_markers_are_rejected(mut registry: ValueExtractorRegistry) {
    let result = registry.register(
        declaration("Both", "Pair")
            .with_type_argument(ExtractedWildcard)
            .with_type_argument(ExtractedWildcard),
    );
    assert!(matches!(result, Err(ExtractionError::MultipleExtractedValues { .. })));
}

#[rstest]
fn argument_count_must_match_the_container(mut registry: ValueExtractorRegistry) {
    let result = registry.register(declaration("Short", "Pair").with_type_argument(ExtractedWildcard));
    assert!(matches!(
        result,
        Err(ExtractionError::ArityMismatch { expected: 2, given: 1, .. })
    ));
}

#[rstest]
fn user_extractors_replace_builtins(mut registry: ValueExtractorRegistry) {
    registry
        .register(declaration("CustomList", well_known::LIST).with_type_argument(ExtractedWildcard))
        .expect("replacing a built-in should succeed");

    assert_eq!(
        resolved_name(&registry, well_known::LIST, 0, well_known::LIST).as_deref(),
        Some("CustomList")
    );
}

#[rstest]
fn duplicate_user_extractors_are_rejected(mut registry: ValueExtractorRegistry) {
    registry
        .register(declaration("First", "Bag").with_type_argument(ExtractedWildcard))
        .expect("first registration should succeed");

    let result = registry.register(declaration("Second", "Bag").with_type_argument(ExtractedWildcard));

    assert_eq!(
        result,
        Err(ExtractionError::DuplicateExtractor {
            container: TypeName::new("Bag"),
            type_argument: 0,
        })
    );
}

// ============================================================================
// Resolution
// ============================================================================

#[rstest]
#[case(well_known::LIST, 0, well_known::LIST, "ListElementExtractor")]
#[case(well_known::ITERABLE, 0, well_known::LIST, "ListElementExtractor")]
#[case(well_known::ITERABLE, 0, well_known::SET, "IterableElementExtractor")]
#[case(well_known::COLLECTION, 0, well_known::SET, "IterableElementExtractor")]
#[case(well_known::MAP, 0, well_known::MAP, "MapKeyExtractor")]
#[case(well_known::MAP, 1, well_known::MAP, "MapValueExtractor")]
#[case(well_known::OPTIONAL, 0, well_known::OPTIONAL, "OptionalValueExtractor")]
#[case(well_known::ARRAY, 0, well_known::ARRAY, "ArrayElementExtractor")]
fn the_most_specific_builtin_wins(
    registry: ValueExtractorRegistry,
    #[case] declared: &str,
    #[case] slot: usize,
    #[case] runtime: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        resolved_name(&registry, declared, slot, runtime).as_deref(),
        Some(expected)
    );
}

#[rstest]
fn unrelated_maximal_extractors_are_ambiguous(mut registry: ValueExtractorRegistry) {
    registry
        .register(declaration("BagExtractor", "Bag").with_type_argument(ExtractedWildcard))
        .and_then(|()| {
            registry.register(declaration("CrateExtractor", "Crate").with_type_argument(ExtractedWildcard))
        })
        .expect("extractors should register");

    let result = registry.resolve_all_elements(&TypeName::new("BagCrate"));

    assert!(matches!(
        result,
        Err(ExtractionError::Ambiguous { ref candidates, .. }) if candidates.len() == 2
    ));
}

#[rstest]
fn the_declared_generic_position_selects_the_capability(mut registry: ValueExtractorRegistry) {
    registry
        .register(declaration("BagExtractor", "Bag").with_type_argument(ExtractedWildcard))
        .and_then(|()| {
            registry.register(declaration("CrateExtractor", "Crate").with_type_argument(ExtractedWildcard))
        })
        .expect("extractors should register");

    assert_eq!(
        resolved_name(&registry, "Bag", 0, "BagCrate").as_deref(),
        Some("BagExtractor")
    );
    assert_eq!(
        resolved_name(&registry, "Crate", 0, "BagCrate").as_deref(),
        Some("CrateExtractor")
    );
}

#[rstest]
fn extractors_inherited_from_a_shared_ancestor_do_not_conflict(
    mut registry: ValueExtractorRegistry,
) {
    registry
        .register(
            declaration("LeftBoxExtractor", "LeftBox")
                .with_type_argument(ExtractedWildcard)
                .inheriting_from("BoxExtractor"),
        )
        .and_then(|()| {
            registry.register(
                declaration("RightBoxExtractor", "RightBox")
                    .with_type_argument(ExtractedWildcard)
                    .inheriting_from("BoxExtractor"),
            )
        })
        .expect("extractors should register");

    let resolved = registry
        .resolve_all_elements(&TypeName::new("TwinBox"))
        .expect("diamond should not be ambiguous");

    assert_eq!(resolved.map(|d| d.origin().to_owned()).as_deref(), Some("BoxExtractor"));
}

#[rstest]
fn unknown_containers_fall_back_to_their_storage_shape(registry: ValueExtractorRegistry) {
    let sack = Value::container("Sack", ContainerContent::Sequence(vec![Value::Int(1)]));

    let resolved = registry
        .resolve_for_value(None, &sack)
        .expect("fallback should resolve");

    assert_eq!(
        resolved.map(|d| d.name().to_owned()).as_deref(),
        Some("IterableElementExtractor")
    );
}

#[rstest]
fn unconstrained_slots_without_extractor_resolve_to_nothing(registry: ValueExtractorRegistry) {
    assert_eq!(resolved_name(&registry, "Bag", 0, "Bag"), None);
}

#[rstest]
fn maps_cascade_into_their_values(registry: ValueExtractorRegistry) {
    let resolved = registry
        .resolve_all_elements(&TypeName::new(well_known::MAP))
        .expect("map resolution should succeed");

    assert_eq!(
        resolved.map(|d| d.name().to_owned()).as_deref(),
        Some("MapValueExtractor")
    );
}
