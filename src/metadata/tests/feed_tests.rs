//! Tests for declaration feeds and the constraint catalogue.

use crate::metadata::{
    BeanDeclaration, ConstraintCatalog, ConstraintDefinition, ConstraintDefinitionSource,
    DeclarationFeed, DefinitionError, FeedError, InMemoryDeclarationFeed, JsonMappingFeed,
    adapters::{constraints, units},
};
use crate::model::{TypeKind, TypeName};
use camino::Utf8PathBuf;
use rstest::rstest;

const MAPPING: &str = r#"{
    "types": [
        { "name": "Fish", "kind": "class" },
        { "name": "Pond", "kind": "class" }
    ],
    "constraints": [
        { "constraint": "Scaly", "validated_by": ["scaly"],
          "attributes": [
            { "name": "message", "kind": "text", "default": "not scaly" },
            { "name": "groups", "kind": "type_list", "default": [] },
            { "name": "payload", "kind": "type_list", "default": [] }
          ] }
    ],
    "beans": [
        { "type": "Fish",
          "fields": [
            { "name": "name", "type": { "name": "String" },
              "constraints": [{ "constraint": "NotNull" }] }
          ] },
        { "type": "Pond",
          "fields": [
            { "name": "fish", "type": { "name": "Fish" }, "cascading": true }
          ] }
    ]
}"#;

// ============================================================================
// JSON mapping feed
// ============================================================================

#[rstest]
fn json_mapping_declares_types_constraints_and_beans() {
    let feed = JsonMappingFeed::from_json(MAPPING).expect("mapping should parse");

    assert_eq!(feed.bean_count(), 2);
    assert_eq!(feed.type_declarations().len(), 2);
    assert_eq!(feed.type_declarations()[0].kind, TypeKind::Class);
    assert_eq!(feed.constraint_definitions()[0].constraint_type.as_str(), "Scaly");

    let fish = feed
        .declarations(&TypeName::new("Fish"))
        .expect("feed should answer")
        .expect("Fish should be declared");
    assert_eq!(fish.fields[0].element.constraints[0].constraint_type.as_str(), constraints::NOT_NULL);

    let pond = feed
        .declarations(&TypeName::new("Pond"))
        .expect("feed should answer")
        .expect("Pond should be declared");
    assert!(pond.fields[0].element.cascading);

    assert!(
        feed.declarations(&TypeName::new("Lake"))
            .expect("feed should answer")
            .is_none()
    );
}

#[rstest]
fn invalid_json_reports_the_source() {
    let result = JsonMappingFeed::from_json("{ \"beans\": 3 }");

    assert!(matches!(
        result,
        Err(FeedError::Parse { source_name, .. }) if source_name == "<inline>"
    ));
}

#[rstest]
fn bean_declared_in_two_documents_is_rejected() {
    let mut feed = JsonMappingFeed::from_json(MAPPING).expect("mapping should parse");

    let result = feed.add_document("second.json", r#"{ "beans": [{ "type": "Fish" }] }"#);

    assert_eq!(
        result.expect_err("duplicate bean should fail"),
        FeedError::DuplicateBean(TypeName::new("Fish"))
    );
}

#[rstest]
fn directory_documents_load_in_name_order() {
    let dir = Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .expect("temporary directory should be UTF-8")
        .join(format!("vauban-mappings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temporary directory should be created");
    std::fs::write(dir.join("b.json"), r#"{ "beans": [{ "type": "Pond" }] }"#)
        .expect("mapping should be written");
    std::fs::write(
        dir.join("a.json"),
        r#"{ "types": [{ "name": "Pond", "kind": "class" }] }"#,
    )
    .expect("mapping should be written");
    std::fs::write(dir.join("notes.txt"), "ignored").expect("notes should be written");

    let feed = JsonMappingFeed::load_dir(&dir);
    std::fs::remove_dir_all(&dir).expect("temporary directory should be removed");

    let feed = feed.expect("directory should load");
    assert_eq!(feed.bean_count(), 1);
    assert_eq!(feed.type_declarations()[0].name.as_str(), "Pond");
}

#[rstest]
fn missing_directory_is_an_io_error() {
    let result = JsonMappingFeed::load_dir(camino::Utf8Path::new("/definitely/not/here"));

    assert!(matches!(result, Err(FeedError::Io { .. })));
}

// ============================================================================
// In-memory feed
// ============================================================================

#[rstest]
fn in_memory_feed_rejects_duplicates() {
    let result = InMemoryDeclarationFeed::with_declarations([
        BeanDeclaration::new("Fish"),
        BeanDeclaration::new("Fish"),
    ]);

    assert_eq!(
        result.expect_err("duplicate should fail"),
        FeedError::DuplicateBean(TypeName::new("Fish"))
    );
}

#[rstest]
fn in_memory_feed_returns_declarations() {
    let feed = InMemoryDeclarationFeed::with_declarations([BeanDeclaration::new("Fish")])
        .expect("declarations should register");

    assert_eq!(feed.len(), 1);
    assert!(
        feed.declarations(&TypeName::new("Fish"))
            .expect("feed should answer")
            .is_some()
    );
}

// ============================================================================
// Catalogue
// ============================================================================

#[rstest]
fn catalogue_lists_builtin_units() {
    let catalog = ConstraintCatalog::new();

    let units_of_not_empty = catalog
        .builtin_checking_units(&TypeName::new(constraints::NOT_EMPTY))
        .expect("NotEmpty should be built in");

    assert_eq!(units_of_not_empty.len(), 4);
    assert_eq!(units_of_not_empty[0].as_str(), units::NOT_EMPTY_CHAR_SEQUENCE);
}

#[rstest]
fn user_definitions_have_no_builtin_units() {
    let catalog = ConstraintCatalog::with_definitions([
        ConstraintDefinition::new("Scaly", "not scaly").validated_by("scaly")
    ])
    .expect("definition should register");

    let scaly = TypeName::new("Scaly");
    assert!(catalog.contains(&scaly));
    assert!(catalog.definition(&scaly).is_some());
    assert!(catalog.builtin_checking_units(&scaly).is_none());
}

#[rstest]
fn redefining_a_constraint_is_rejected() {
    let result = ConstraintCatalog::with_definitions([ConstraintDefinition::new(
        constraints::NOT_NULL,
        "again",
    )]);

    assert!(matches!(
        result,
        Err(DefinitionError::MalformedConstraint { constraint, .. })
            if constraint.as_str() == constraints::NOT_NULL
    ));
}
