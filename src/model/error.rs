//! Error types for the type system.

use super::TypeName;
use thiserror::Error;

/// Errors raised while registering type declarations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeSystemError {
    /// A type with the same name is already registered.
    #[error("type {0} is already declared")]
    DuplicateType(TypeName),

    /// Two group sequences share the same name.
    #[error("group sequence {0} is defined more than once")]
    DuplicateGroupSequence(TypeName),

    /// A supertype references a type variable the declaring type does not define.
    #[error("type {owner} binds unknown type variable {variable}")]
    UnknownTypeVariable {
        /// Declaring type.
        owner: TypeName,
        /// Referenced variable.
        variable: String,
    },

    /// A supertype is passed more arguments than it declares parameters.
    #[error("type {owner} passes {given} type arguments to {supertype}, which declares {expected}")]
    SupertypeArity {
        /// Declaring type.
        owner: TypeName,
        /// Referenced supertype.
        supertype: TypeName,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        given: usize,
    },
}

/// Result alias for type system operations.
pub type TypeSystemResult<T> = Result<T, TypeSystemError>;
