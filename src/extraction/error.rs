//! Error types for value extractor registration and resolution.

use crate::model::TypeName;
use thiserror::Error;

/// Errors raised when registering or resolving value extractors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The declaration lists a different number of type arguments than the container declares.
    #[error(
        "value extractor {extractor} declares {given} type arguments for {container}, which has {expected}"
    )]
    ArityMismatch {
        /// Extractor name.
        extractor: String,
        /// Container type.
        container: TypeName,
        /// Declared type parameter count.
        expected: usize,
        /// Supplied argument count.
        given: usize,
    },

    /// A type argument carries a bound; only unbounded wildcards are allowed.
    #[error("value extractor {extractor} for {container} may only use unbounded wildcard type arguments")]
    BoundedTypeArgument {
        /// Extractor name.
        extractor: String,
        /// Container type.
        container: TypeName,
    },

    /// No type argument is marked as the extracted value.
    #[error("value extractor {extractor} does not mark any type argument as extracted")]
    MissingExtractedValue {
        /// Extractor name.
        extractor: String,
    },

    /// More than one type argument is marked as the extracted value.
    #[error("value extractor {extractor} marks more than one type argument as extracted")]
    MultipleExtractedValues {
        /// Extractor name.
        extractor: String,
    },

    /// Two user extractors target the same container slot.
    #[error("a value extractor for {container} type argument {type_argument} is already registered")]
    DuplicateExtractor {
        /// Container type.
        container: TypeName,
        /// Extracted type argument index.
        type_argument: usize,
    },

    /// Several maximally specific extractors match and none is preferred.
    #[error("ambiguous value extractors for {container}: {}", .candidates.join(", "))]
    Ambiguous {
        /// Runtime container type.
        container: TypeName,
        /// Names of the competing extractors.
        candidates: Vec<String>,
    },

    /// A container element is constrained but nothing can extract it.
    #[error("no value extractor found for {container} type argument {type_argument}")]
    NoExtractor {
        /// Declared container type.
        container: TypeName,
        /// Type argument index.
        type_argument: usize,
    },
}

impl ExtractionError {
    /// Creates an ambiguity error.
    #[must_use]
    pub fn ambiguous(container: TypeName, candidates: impl IntoIterator<Item = String>) -> Self {
        Self::Ambiguous {
            container,
            candidates: candidates.into_iter().collect(),
        }
    }
}

/// Result alias for extractor operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;
