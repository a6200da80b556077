//! Built-in implementations of the engine ports.

pub mod interpolator;
pub mod traversable;
pub mod units;

pub use interpolator::{TemplateInterpolator, VALIDATED_VALUE};
pub use traversable::TraverseAll;
pub use units::{SharedClock, builtin_checking_units};
