//! Domain types produced by validation.

pub mod path;
pub mod violation;

pub use path::{NodeKind, PathNode, PathSegment, PropertyPath, RETURN_VALUE_NODE, Selector};
pub use violation::{ConstraintViolation, ViolationParts, Violations};
