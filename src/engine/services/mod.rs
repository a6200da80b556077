//! Engine services: checking unit selection, group ordering, constraint
//! execution and graph traversal.

pub mod context;
pub mod executor;
pub mod factory;
pub mod order;
pub mod units;
pub mod validator;

pub use context::ValidationContext;
pub use executor::{ConstraintTreeExecutor, PendingViolation};
pub use factory::{ValidatorFactory, ValidatorFactoryBuilder};
pub use order::{GroupSequence, ValidationOrder, ValidationOrderGenerator};
pub use units::CheckingUnitRegistry;
pub use validator::Validator;
