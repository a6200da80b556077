//! Catalogue of constraint definitions, seeded with the built-in constraints.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::metadata::{
    domain::{AttributeDefinition, AttributeKind, CheckingUnitId, ConstraintDefinition},
    error::{DefinitionError, DefinitionResult},
    ports::ConstraintDefinitionSource,
};
use crate::model::TypeName;

/// Names of the built-in constraint types.
pub mod constraints {
    /// The value must not be null.
    pub const NOT_NULL: &str = "NotNull";
    /// The value must be null.
    pub const NULL: &str = "Null";
    /// The value must be neither null nor empty.
    pub const NOT_EMPTY: &str = "NotEmpty";
    /// The text must contain a non-whitespace character.
    pub const NOT_BLANK: &str = "NotBlank";
    /// The size must lie between `min` and `max`.
    pub const SIZE: &str = "Size";
    /// The number must be at least `value`.
    pub const MIN: &str = "Min";
    /// The number must be at most `value`.
    pub const MAX: &str = "Max";
    /// The number must be strictly positive.
    pub const POSITIVE: &str = "Positive";
    /// The number must be strictly negative.
    pub const NEGATIVE: &str = "Negative";
    /// The text must match `regexp`.
    pub const PATTERN: &str = "Pattern";
    /// The boolean must be true.
    pub const ASSERT_TRUE: &str = "AssertTrue";
    /// The boolean must be false.
    pub const ASSERT_FALSE: &str = "AssertFalse";
    /// The instant must lie in the past.
    pub const PAST: &str = "Past";
    /// The instant must lie in the future.
    pub const FUTURE: &str = "Future";
}

/// Identifiers of the built-in checking units.
pub mod units {
    /// `NotNull` for any value.
    pub const NOT_NULL: &str = "not-null";
    /// `Null` for any value.
    pub const NULL: &str = "null";
    /// `NotEmpty` for text.
    pub const NOT_EMPTY_CHAR_SEQUENCE: &str = "not-empty.char-sequence";
    /// `NotEmpty` for collections.
    pub const NOT_EMPTY_COLLECTION: &str = "not-empty.collection";
    /// `NotEmpty` for maps.
    pub const NOT_EMPTY_MAP: &str = "not-empty.map";
    /// `NotEmpty` for arrays.
    pub const NOT_EMPTY_ARRAY: &str = "not-empty.array";
    /// `NotBlank` for text.
    pub const NOT_BLANK: &str = "not-blank";
    /// `Size` for text.
    pub const SIZE_CHAR_SEQUENCE: &str = "size.char-sequence";
    /// `Size` for collections.
    pub const SIZE_COLLECTION: &str = "size.collection";
    /// `Size` for maps.
    pub const SIZE_MAP: &str = "size.map";
    /// `Size` for arrays.
    pub const SIZE_ARRAY: &str = "size.array";
    /// `Min` for numbers.
    pub const MIN_NUMBER: &str = "min.number";
    /// `Max` for numbers.
    pub const MAX_NUMBER: &str = "max.number";
    /// `Positive` for numbers.
    pub const POSITIVE_NUMBER: &str = "positive.number";
    /// `Negative` for numbers.
    pub const NEGATIVE_NUMBER: &str = "negative.number";
    /// `Pattern` for text.
    pub const PATTERN: &str = "pattern";
    /// `AssertTrue` for booleans.
    pub const ASSERT_TRUE: &str = "assert-true";
    /// `AssertFalse` for booleans.
    pub const ASSERT_FALSE: &str = "assert-false";
    /// `Past` for instants.
    pub const PAST_INSTANT: &str = "past.instant";
    /// `Future` for instants.
    pub const FUTURE_INSTANT: &str = "future.instant";
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    definition: Arc<ConstraintDefinition>,
    builtin_units: Option<Vec<CheckingUnitId>>,
}

/// Constraint definitions known to a validator factory.
#[derive(Debug, Clone)]
pub struct ConstraintCatalog {
    entries: HashMap<TypeName, CatalogEntry>,
}

impl ConstraintCatalog {
    /// Creates a catalogue holding the built-in constraints.
    #[must_use]
    pub fn new() -> Self {
        let entries = builtin_entries()
            .into_iter()
            .map(|(definition, units)| {
                let entry = CatalogEntry {
                    definition: Arc::new(definition),
                    builtin_units: Some(units),
                };
                (entry.definition.constraint_type.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    /// Creates a catalogue holding the built-in constraints and `definitions`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::MalformedConstraint`] when a type is
    /// defined twice.
    pub fn with_definitions(
        definitions: impl IntoIterator<Item = ConstraintDefinition>,
    ) -> DefinitionResult<Self> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Adds a user-defined constraint.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::MalformedConstraint`] when the type is
    /// already defined.
    pub fn register(&mut self, definition: ConstraintDefinition) -> DefinitionResult<()> {
        let constraint_type = definition.constraint_type.clone();
        if self.entries.contains_key(&constraint_type) {
            return Err(DefinitionError::malformed(
                &constraint_type,
                "the constraint type is already defined",
            ));
        }
        debug!(constraint = %constraint_type, "registered constraint definition");
        self.entries.insert(
            constraint_type,
            CatalogEntry {
                definition: Arc::new(definition),
                builtin_units: None,
            },
        );
        Ok(())
    }

    /// Returns `true` when `constraint_type` is defined.
    #[must_use]
    pub fn contains(&self, constraint_type: &TypeName) -> bool {
        self.entries.contains_key(constraint_type)
    }
}

impl Default for ConstraintCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintDefinitionSource for ConstraintCatalog {
    fn definition(&self, constraint_type: &TypeName) -> Option<Arc<ConstraintDefinition>> {
        self.entries
            .get(constraint_type)
            .map(|entry| Arc::clone(&entry.definition))
    }

    fn builtin_checking_units(&self, constraint_type: &TypeName) -> Option<Vec<CheckingUnitId>> {
        self.entries
            .get(constraint_type)
            .and_then(|entry| entry.builtin_units.clone())
    }
}

fn builtin_entries() -> Vec<(ConstraintDefinition, Vec<CheckingUnitId>)> {
    vec![
        builtin(
            ConstraintDefinition::new(constraints::NOT_NULL, "must not be null"),
            &[units::NOT_NULL],
        ),
        builtin(
            ConstraintDefinition::new(constraints::NULL, "must be null"),
            &[units::NULL],
        ),
        builtin(
            ConstraintDefinition::new(constraints::NOT_EMPTY, "must not be empty"),
            &[
                units::NOT_EMPTY_CHAR_SEQUENCE,
                units::NOT_EMPTY_COLLECTION,
                units::NOT_EMPTY_MAP,
                units::NOT_EMPTY_ARRAY,
            ],
        ),
        builtin(
            ConstraintDefinition::new(constraints::NOT_BLANK, "must not be blank"),
            &[units::NOT_BLANK],
        ),
        builtin(
            ConstraintDefinition::new(
                constraints::SIZE,
                "size must be between {{ min }} and {{ max }}",
            )
            .with_attribute(AttributeDefinition::new("min", AttributeKind::Integer).with_default(0))
            .with_attribute(
                AttributeDefinition::new("max", AttributeKind::Integer)
                    .with_default(i64::from(i32::MAX)),
            ),
            &[
                units::SIZE_CHAR_SEQUENCE,
                units::SIZE_COLLECTION,
                units::SIZE_MAP,
                units::SIZE_ARRAY,
            ],
        ),
        builtin(
            ConstraintDefinition::new(constraints::MIN, "must be greater than or equal to {{ value }}")
                .with_attribute(AttributeDefinition::new("value", AttributeKind::Integer)),
            &[units::MIN_NUMBER],
        ),
        builtin(
            ConstraintDefinition::new(constraints::MAX, "must be less than or equal to {{ value }}")
                .with_attribute(AttributeDefinition::new("value", AttributeKind::Integer)),
            &[units::MAX_NUMBER],
        ),
        builtin(
            ConstraintDefinition::new(constraints::POSITIVE, "must be greater than 0"),
            &[units::POSITIVE_NUMBER],
        ),
        builtin(
            ConstraintDefinition::new(constraints::NEGATIVE, "must be less than 0"),
            &[units::NEGATIVE_NUMBER],
        ),
        builtin(
            ConstraintDefinition::new(constraints::PATTERN, "must match \"{{ regexp }}\"")
                .with_attribute(AttributeDefinition::new("regexp", AttributeKind::Text)),
            &[units::PATTERN],
        ),
        builtin(
            ConstraintDefinition::new(constraints::ASSERT_TRUE, "must be true"),
            &[units::ASSERT_TRUE],
        ),
        builtin(
            ConstraintDefinition::new(constraints::ASSERT_FALSE, "must be false"),
            &[units::ASSERT_FALSE],
        ),
        builtin(
            ConstraintDefinition::new(constraints::PAST, "must be a past date"),
            &[units::PAST_INSTANT],
        ),
        builtin(
            ConstraintDefinition::new(constraints::FUTURE, "must be a future date"),
            &[units::FUTURE_INSTANT],
        ),
    ]
}

fn builtin(
    definition: ConstraintDefinition,
    units: &[&str],
) -> (ConstraintDefinition, Vec<CheckingUnitId>) {
    (definition, units.iter().copied().map(CheckingUnitId::new).collect())
}
