//! Port contracts of the validation engine.

pub mod checking;
pub mod interpolator;
pub mod traversable;

pub use checking::{CheckContext, CheckingUnit, ConstraintValidator, InitializationError};
pub use interpolator::MessageInterpolator;
pub use traversable::TraversableResolver;
