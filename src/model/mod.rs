//! Shared kernel: type declarations, the type system and runtime values.
//!
//! Every other bounded context reasons about types through [`TypeSystem`]
//! and about instances through [`Value`]. The type system replaces runtime
//! reflection: hierarchy closure, assignability and generic parameter
//! binding are computed from explicit [`TypeDecl`] registrations.

pub mod error;
pub mod hierarchy;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use error::{TypeSystemError, TypeSystemResult};
pub use hierarchy::TypeSystem;
pub use types::{SuperType, TypeArgument, TypeDecl, TypeKind, TypeName, TypeRef, well_known};
pub use value::{BeanRef, ContainerContent, ContainerValue, Value};
