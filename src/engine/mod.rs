//! Validation engine: traversal of object graphs and evaluation of
//! constraint trees.
//!
//! A [`ValidatorFactory`] owns the caches built from the metadata context;
//! its [`Validator`]s walk bean graphs group by group, run each applicable
//! constraint through its checking unit and collect [`Violations`].
//!
//! - Property paths and violations in [`domain`]
//! - Checking unit, interpolator and traversable resolver ports in [`ports`]
//! - Built-in checking units, template interpolation and traversal policy
//!   in [`adapters`]
//! - Group ordering, constraint execution and traversal in [`services`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

pub use adapters::{SharedClock, TemplateInterpolator, TraverseAll, VALIDATED_VALUE};
pub use config::ValidatorConfig;
pub use domain::{ConstraintViolation, NodeKind, PathNode, PropertyPath, Violations};
pub use error::{ValidationError, ValidationResult};
pub use ports::{
    CheckContext, CheckingUnit, ConstraintValidator, InitializationError, MessageInterpolator,
    TraversableResolver,
};
pub use services::{Validator, ValidatorFactory, ValidatorFactoryBuilder};
