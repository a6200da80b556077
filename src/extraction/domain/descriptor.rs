//! Value extractor declarations and their validated descriptors.

use super::extracted::{ExtractedValue, ValueCollector};
use crate::extraction::{
    error::{ExtractionError, ExtractionResult},
    ports::ValueExtractor,
};
use crate::model::{TypeName, TypeRef, TypeSystem, Value};
use std::sync::Arc;

/// A type argument in an extractor declaration, e.g. the `?` in `List<?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorTypeArgument {
    /// Unbounded wildcard that is not extracted.
    Wildcard,
    /// Unbounded wildcard marking the extracted slot.
    ExtractedWildcard,
    /// Bounded argument that is not extracted.
    Bounded(TypeRef),
    /// Bounded argument marking the extracted slot.
    ExtractedBounded(TypeRef),
}

impl ExtractorTypeArgument {
    const fn is_extracted(&self) -> bool {
        matches!(self, Self::ExtractedWildcard | Self::ExtractedBounded(_))
    }

    const fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded(_) | Self::ExtractedBounded(_))
    }
}

/// User-facing declaration of a value extractor.
#[derive(Debug, Clone)]
pub struct ExtractorDeclaration {
    name: String,
    container: TypeName,
    type_arguments: Vec<ExtractorTypeArgument>,
    inherited_from: Option<String>,
    extractor: Arc<dyn ValueExtractor>,
}

impl ExtractorDeclaration {
    /// Declares an extractor for `container` with no type arguments yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        container: impl Into<TypeName>,
        extractor: Arc<dyn ValueExtractor>,
    ) -> Self {
        Self {
            name: name.into(),
            container: container.into(),
            type_arguments: Vec::new(),
            inherited_from: None,
            extractor,
        }
    }

    /// Appends a type argument.
    #[must_use]
    pub fn with_type_argument(mut self, argument: ExtractorTypeArgument) -> Self {
        self.type_arguments.push(argument);
        self
    }

    /// Marks the declaration as inherited from an ancestor declaration.
    ///
    /// Declarations inheriting from the same ancestor never conflict.
    #[must_use]
    pub fn inheriting_from(mut self, ancestor: impl Into<String>) -> Self {
        self.inherited_from = Some(ancestor.into());
        self
    }

    /// Returns the extractor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A validated extractor bound to one container type argument.
#[derive(Debug, Clone)]
pub struct ValueExtractorDescriptor {
    name: String,
    container: TypeName,
    type_argument: usize,
    origin: String,
    builtin: bool,
    extractor: Arc<dyn ValueExtractor>,
}

impl ValueExtractorDescriptor {
    /// Validates a declaration against the container's type parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the argument count differs from the
    /// container's parameters, an argument is bounded, or the extracted
    /// slot is missing or marked twice.
    pub fn from_declaration(
        declaration: ExtractorDeclaration,
        type_system: &TypeSystem,
    ) -> ExtractionResult<Self> {
        let expected = type_system.type_parameters(&declaration.container).len();
        if declaration.type_arguments.len() != expected {
            return Err(ExtractionError::ArityMismatch {
                extractor: declaration.name,
                container: declaration.container,
                expected,
                given: declaration.type_arguments.len(),
            });
        }
        if declaration
            .type_arguments
            .iter()
            .any(ExtractorTypeArgument::is_bounded)
        {
            return Err(ExtractionError::BoundedTypeArgument {
                extractor: declaration.name,
                container: declaration.container,
            });
        }
        let mut extracted = declaration
            .type_arguments
            .iter()
            .enumerate()
            .filter(|(_, argument)| argument.is_extracted())
            .map(|(index, _)| index);
        let Some(type_argument) = extracted.next() else {
            return Err(ExtractionError::MissingExtractedValue {
                extractor: declaration.name,
            });
        };
        if extracted.next().is_some() {
            return Err(ExtractionError::MultipleExtractedValues {
                extractor: declaration.name,
            });
        }
        let origin = declaration
            .inherited_from
            .unwrap_or_else(|| declaration.name.clone());
        Ok(Self {
            name: declaration.name,
            container: declaration.container,
            type_argument,
            origin,
            builtin: false,
            extractor: declaration.extractor,
        })
    }

    pub(crate) fn into_builtin(mut self) -> Self {
        self.builtin = true;
        self
    }

    /// Returns the extractor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the container type the extractor was declared for.
    #[must_use]
    pub const fn container(&self) -> &TypeName {
        &self.container
    }

    /// Returns the extracted type argument index.
    #[must_use]
    pub const fn type_argument(&self) -> usize {
        self.type_argument
    }

    /// Returns the declaration site shared by inheriting declarations.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns `true` for extractors shipped with the engine.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Extracts every element of `container`.
    #[must_use]
    pub fn extract_all(&self, container: &Value) -> Vec<ExtractedValue> {
        let mut collector = ValueCollector::default();
        self.extractor.extract(container, &mut collector);
        collector.values
    }
}
