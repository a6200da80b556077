//! Traversable resolver port.

use crate::engine::domain::PropertyPath;
use crate::metadata::ElementKind;
use crate::model::{BeanRef, TypeName};

/// Decides whether a cascaded property may be descended into.
///
/// Lets an owner of lazily loaded state veto a cascade without forcing a
/// load.
#[cfg_attr(test, mockall::automock)]
pub trait TraversableResolver: Send + Sync {
    /// Returns `true` when `property` of `bean` may be traversed.
    ///
    /// `path` is the path of `bean` from the root of type `root_type`.
    fn is_traversable(
        &self,
        bean: &BeanRef,
        property: &str,
        root_type: &TypeName,
        path: &PropertyPath,
        element_kind: ElementKind,
    ) -> bool;
}
