//! Port through which container values hand their elements to the engine.

use crate::model::Value;
use std::fmt;

/// Receives values extracted from a container.
///
/// The node name identifies the container element kind in property paths
/// (e.g. `<list element>`); `None` means the element is reported at the
/// container's own node.
pub trait ValueReceiver {
    /// Receives a single wrapped value.
    fn value(&mut self, node_name: Option<&str>, value: Value);

    /// Receives an element of an unordered iterable.
    fn iterable_value(&mut self, node_name: &str, value: Value);

    /// Receives an element at a position.
    fn indexed_value(&mut self, node_name: &str, index: usize, value: Value);

    /// Receives an element addressed by a key.
    fn keyed_value(&mut self, node_name: &str, key: Value, value: Value);
}

/// Extracts the values held in one type argument slot of a container.
pub trait ValueExtractor: Send + Sync + fmt::Debug {
    /// Passes every extracted value of `container` to `receiver`.
    ///
    /// Values the extractor does not understand are ignored.
    fn extract(&self, container: &Value, receiver: &mut dyn ValueReceiver);
}
