//! Extractors for the container types the engine understands natively.

use crate::extraction::{
    domain::{ExtractorDeclaration, ExtractorTypeArgument},
    ports::{ValueExtractor, ValueReceiver},
};
use crate::model::{ContainerContent, Value, well_known};
use std::sync::Arc;

/// Node name of list elements.
pub const LIST_ELEMENT_NODE: &str = "<list element>";
/// Node name of iterable and array elements.
pub const ITERABLE_ELEMENT_NODE: &str = "<iterable element>";
/// Node name of map keys.
pub const MAP_KEY_NODE: &str = "<map key>";
/// Node name of map values.
pub const MAP_VALUE_NODE: &str = "<map value>";

fn content(container: &Value) -> Option<&ContainerContent> {
    container.as_container().map(|container| container.content())
}

/// Extracts list elements with their positions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListElementExtractor;

impl ValueExtractor for ListElementExtractor {
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver) {
        if let Some(ContainerContent::Sequence(elements)) = content(container) {
            for (index, element) in elements.iter().enumerate() {
                receiver.indexed_value(LIST_ELEMENT_NODE, index, element.clone());
            }
        }
    }
}

/// Extracts the elements of any iterable without positions.
#[derive(Debug, Default, Clone, Copy)]
pub struct IterableElementExtractor;

impl ValueExtractor for IterableElementExtractor {
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver) {
        if let Some(ContainerContent::Sequence(elements)) = content(container) {
            for element in elements {
                receiver.iterable_value(ITERABLE_ELEMENT_NODE, element.clone());
            }
        }
    }
}

/// Extracts array elements with their positions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayElementExtractor;

impl ValueExtractor for ArrayElementExtractor {
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver) {
        if let Some(ContainerContent::Sequence(elements)) = content(container) {
            for (index, element) in elements.iter().enumerate() {
                receiver.indexed_value(ITERABLE_ELEMENT_NODE, index, element.clone());
            }
        }
    }
}

/// Extracts map keys, each keyed by itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapKeyExtractor;

impl ValueExtractor for MapKeyExtractor {
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver) {
        if let Some(ContainerContent::Entries(entries)) = content(container) {
            for (key, _) in entries {
                receiver.keyed_value(MAP_KEY_NODE, key.clone(), key.clone());
            }
        }
    }
}

/// Extracts map values keyed by their entry key.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapValueExtractor;

impl ValueExtractor for MapValueExtractor {
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver) {
        if let Some(ContainerContent::Entries(entries)) = content(container) {
            for (key, value) in entries {
                receiver.keyed_value(MAP_VALUE_NODE, key.clone(), value.clone());
            }
        }
    }
}

/// Unwraps an optional value; an empty optional yields null.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptionalValueExtractor;

impl ValueExtractor for OptionalValueExtractor {
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver) {
        if let Some(ContainerContent::Single(held)) = content(container) {
            receiver.value(None, held.clone().unwrap_or(Value::Null));
        }
    }
}

/// Declarations of every built-in extractor.
#[must_use]
pub fn builtin_declarations() -> Vec<ExtractorDeclaration> {
    use ExtractorTypeArgument::{ExtractedWildcard, Wildcard};
    vec![
        ExtractorDeclaration::new("ListElementExtractor", well_known::LIST, Arc::new(ListElementExtractor))
            .with_type_argument(ExtractedWildcard),
        ExtractorDeclaration::new(
            "IterableElementExtractor",
            well_known::ITERABLE,
            Arc::new(IterableElementExtractor),
        )
        .with_type_argument(ExtractedWildcard),
        ExtractorDeclaration::new("ArrayElementExtractor", well_known::ARRAY, Arc::new(ArrayElementExtractor))
            .with_type_argument(ExtractedWildcard),
        ExtractorDeclaration::new("MapKeyExtractor", well_known::MAP, Arc::new(MapKeyExtractor))
            .with_type_argument(ExtractedWildcard)
            .with_type_argument(Wildcard),
        ExtractorDeclaration::new("MapValueExtractor", well_known::MAP, Arc::new(MapValueExtractor))
            .with_type_argument(Wildcard)
            .with_type_argument(ExtractedWildcard),
        ExtractorDeclaration::new(
            "OptionalValueExtractor",
            well_known::OPTIONAL,
            Arc::new(OptionalValueExtractor),
        )
        .with_type_argument(ExtractedWildcard),
    ]
}
