//! Error types for validation calls.
//!
//! Constraint violations are never errors; they are returned as
//! [`super::Violations`]. The errors here are usage errors and the
//! definition errors surfaced by lazily built metadata.

use crate::extraction::ExtractionError;
use crate::metadata::{CheckingUnitId, DefinitionError, FeedError};
use crate::model::{TypeName, TypeSystemError};
use thiserror::Error;

/// Errors raised by validator construction and validation calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Metadata of a validated type could not be built.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// The object passed for validation is null.
    #[error("the object to validate must not be null")]
    NullRoot,

    /// The object passed for validation is not a bean.
    #[error("values of type {0} cannot be validated as beans")]
    NotABean(TypeName),

    /// A property path does not resolve against the validated type.
    #[error("{path} is not a valid property path of {bean}")]
    InvalidPropertyPath {
        /// Type the path was resolved against.
        bean: TypeName,
        /// Offending path.
        path: String,
    },

    /// Method arguments do not match the method's parameters.
    #[error("{method} takes {expected} arguments but {given} were passed")]
    ParameterCount {
        /// Method signature.
        method: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        given: usize,
    },

    /// None of a constraint's checking units supports the validated type.
    #[error("no checking unit of {constraint} supports {value_type}")]
    NoCheckingUnit {
        /// Constraint type.
        constraint: TypeName,
        /// Runtime or declared type of the validated value.
        value_type: TypeName,
    },

    /// Several checking units of a constraint are equally specific.
    #[error("ambiguous checking units of {constraint} for {value_type}: {}", .candidates.join(", "))]
    AmbiguousCheckingUnit {
        /// Constraint type.
        constraint: TypeName,
        /// Runtime or declared type of the validated value.
        value_type: TypeName,
        /// Competing unit identifiers.
        candidates: Vec<String>,
    },

    /// A descriptor refers to a checking unit nobody registered.
    #[error("checking unit {0} is not registered")]
    UnknownCheckingUnit(CheckingUnitId),

    /// A checking unit identifier is registered twice.
    #[error("checking unit {0} is already registered")]
    DuplicateCheckingUnit(CheckingUnitId),

    /// A checking unit rejected its constraint's attributes.
    #[error("checking unit {unit} could not be initialised: {reason}")]
    CheckingUnitInitialization {
        /// Failing unit.
        unit: CheckingUnitId,
        /// Reason reported by the unit.
        reason: String,
    },
}

impl From<ExtractionError> for ValidationError {
    fn from(error: ExtractionError) -> Self {
        Self::Definition(DefinitionError::Extraction(error))
    }
}

impl From<TypeSystemError> for ValidationError {
    fn from(error: TypeSystemError) -> Self {
        Self::Definition(DefinitionError::TypeSystem(error))
    }
}

impl From<FeedError> for ValidationError {
    fn from(error: FeedError) -> Self {
        Self::Definition(DefinitionError::Feed(error))
    }
}

impl ValidationError {
    /// Creates an invalid property path error.
    #[must_use]
    pub fn invalid_path(bean: &TypeName, path: impl Into<String>) -> Self {
        Self::InvalidPropertyPath {
            bean: bean.clone(),
            path: path.into(),
        }
    }
}

/// Result alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
