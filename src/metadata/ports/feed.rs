//! Source of raw constraint declarations per type.

use crate::metadata::{domain::BeanDeclaration, error::FeedResult};
use crate::model::TypeName;

/// Lists the declarations made directly on a type.
///
/// The feed abstracts over the declaration format; the engine only asks
/// for the declarations of one type at a time, and at most once per type
/// and validator factory.
pub trait DeclarationFeed: Send + Sync {
    /// Returns the declarations made on `bean_type`, or `None` when it
    /// declares nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::metadata::FeedError`] when the backing source fails.
    fn declarations(&self, bean_type: &TypeName) -> FeedResult<Option<BeanDeclaration>>;
}
