//! Default traversable resolver.

use crate::engine::{domain::PropertyPath, ports::TraversableResolver};
use crate::metadata::ElementKind;
use crate::model::{BeanRef, TypeName};

/// Allows every cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraverseAll;

impl TraversableResolver for TraverseAll {
    fn is_traversable(
        &self,
        _bean: &BeanRef,
        _property: &str,
        _root_type: &TypeName,
        _path: &PropertyPath,
        _element_kind: ElementKind,
    ) -> bool {
        true
    }
}
