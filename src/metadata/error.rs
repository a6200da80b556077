//! Error types for constraint definitions, declarations and metadata building.

use super::domain::AttributeKind;
use crate::extraction::ExtractionError;
use crate::model::{TypeName, TypeSystemError};
use thiserror::Error;

/// Errors raised while reading constraint declarations from a feed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// A mapping source could not be read.
    #[error("failed to read mapping {source_name}: {message}")]
    Io {
        /// File or directory that failed.
        source_name: String,
        /// Underlying error message.
        message: String,
    },

    /// A mapping document is not valid.
    #[error("failed to parse mapping {source_name}: {message}")]
    Parse {
        /// Document that failed.
        source_name: String,
        /// Parser error message.
        message: String,
    },

    /// A bean is declared by more than one mapping.
    #[error("bean {0} is declared more than once")]
    DuplicateBean(TypeName),

    /// The feed's backing store is unavailable.
    #[error("declaration feed unavailable: {0}")]
    Unavailable(String),
}

impl FeedError {
    /// Creates an I/O error for a named source.
    #[must_use]
    pub fn io(source_name: impl Into<String>, error: &std::io::Error) -> Self {
        Self::Io {
            source_name: source_name.into(),
            message: error.to_string(),
        }
    }

    /// Creates a parse error for a named source.
    #[must_use]
    pub fn parse(source_name: impl Into<String>, error: &serde_json::Error) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: error.to_string(),
        }
    }
}

/// Declaration and definition errors.
///
/// These are fatal for the type whose metadata triggered them and are
/// raised the first time that metadata is built or used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// No definition is known for a constraint type.
    #[error("unknown constraint type {0}")]
    UnknownConstraint(TypeName),

    /// A constraint definition violates the authoring contract.
    #[error("constraint {constraint} is malformed: {reason}")]
    MalformedConstraint {
        /// Offending constraint type.
        constraint: TypeName,
        /// What is wrong.
        reason: String,
    },

    /// A declaration sets an attribute the constraint does not define.
    #[error("constraint {constraint} has no attribute {attribute}")]
    UnknownAttribute {
        /// Constraint type.
        constraint: TypeName,
        /// Attribute name.
        attribute: String,
    },

    /// A declaration omits an attribute that has no default.
    #[error("constraint {constraint} requires a value for {attribute}")]
    MissingAttributeValue {
        /// Constraint type.
        constraint: TypeName,
        /// Attribute name.
        attribute: String,
    },

    /// A declared attribute value does not match the attribute's kind.
    #[error("attribute {attribute} of {constraint} must be {expected}")]
    InvalidAttributeValue {
        /// Constraint type.
        constraint: TypeName,
        /// Attribute name.
        attribute: String,
        /// Expected kind.
        expected: AttributeKind,
    },

    /// An overriding attribute targets an attribute of a different kind.
    #[error(
        "attribute {attribute} of {constraint} overrides {target}.{target_attribute} of a different type"
    )]
    OverrideTypeMismatch {
        /// Composed constraint type.
        constraint: TypeName,
        /// Overriding attribute.
        attribute: String,
        /// Composing constraint type.
        target: TypeName,
        /// Overridden attribute.
        target_attribute: String,
    },

    /// An overriding attribute targets an attribute that does not exist.
    #[error("attribute {attribute} of {constraint} overrides unknown attribute {target}.{target_attribute}")]
    UnknownOverrideTarget {
        /// Composed constraint type.
        constraint: TypeName,
        /// Overriding attribute.
        attribute: String,
        /// Composing constraint type.
        target: TypeName,
        /// Missing attribute.
        target_attribute: String,
    },

    /// A constraint is composed of itself, directly or transitively.
    #[error("constraint {0} is composed of itself")]
    CyclicComposition(TypeName),

    /// A constraint has neither checking units nor composing constraints.
    #[error("constraint {0} has no checking unit and no composing constraints")]
    MissingCheckingUnit(TypeName),

    /// A container element declaration names a type argument the container lacks.
    #[error("{container} has no type argument {type_argument}")]
    InvalidTypeArgument {
        /// Declared container type.
        container: TypeName,
        /// Requested type argument.
        type_argument: usize,
    },

    /// More than one method of an overriding hierarchy constrains its parameters.
    #[error("parameter constraints of {method} are declared in several types: {}", join(.declared_by))]
    ParameterConstraintsStrengthened {
        /// Method signature.
        method: String,
        /// Types declaring parameter constraints.
        declared_by: Vec<TypeName>,
    },

    /// A method constrains its parameters while a parallel declaration does not extend it.
    #[error("parameter constraints of {method} in {constrained} conflict with the parallel declaration in {parallel}")]
    ParallelParameterConstraints {
        /// Method signature.
        method: String,
        /// Type declaring the parameter constraints.
        constrained: TypeName,
        /// Unrelated type declaring the same method.
        parallel: TypeName,
    },

    /// A redefined default group sequence does not contain the bean's own marker.
    #[error("the default group sequence of {0} must contain {0}")]
    DefaultSequenceWithoutBean(TypeName),

    /// A redefined default group sequence contains the bean's marker more than once.
    #[error("the default group sequence of {0} contains {0} more than once")]
    BeanRepeatedInDefaultSequence(TypeName),

    /// A redefined default group sequence contains the `Default` group.
    #[error("the default group sequence of {0} must not contain Default")]
    DefaultGroupInSequence(TypeName),

    /// A group sequence refers back to itself.
    #[error("group sequence {0} is cyclic")]
    CyclicGroupSequence(TypeName),

    /// A group sequence repeats a group out of order.
    #[error("group sequence {0} cannot be expanded: a group is repeated out of order")]
    UnexpandableGroupSequence(TypeName),

    /// Value extractor registration or resolution failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Type registration failed.
    #[error(transparent)]
    TypeSystem(#[from] TypeSystemError),

    /// The declaration feed failed.
    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl DefinitionError {
    /// Creates a malformed-constraint error.
    #[must_use]
    pub fn malformed(constraint: &TypeName, reason: impl Into<String>) -> Self {
        Self::MalformedConstraint {
            constraint: constraint.clone(),
            reason: reason.into(),
        }
    }
}

fn join(types: &[TypeName]) -> String {
    types
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias for metadata operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Result alias for declaration feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
