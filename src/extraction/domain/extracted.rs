//! Values handed out by extractors, with their path coordinates.

use crate::extraction::ports::ValueReceiver;
use crate::model::Value;

/// A value extracted from a container together with the data needed to
/// build its property path node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue {
    /// Container element node name, if any.
    pub node_name: Option<String>,
    /// Whether the element lives in an iterable container.
    pub iterable: bool,
    /// Position for indexed containers.
    pub index: Option<usize>,
    /// Key for keyed containers.
    pub key: Option<Value>,
    /// The extracted value.
    pub value: Value,
}

/// [`ValueReceiver`] collecting every received value in order.
#[derive(Debug, Default)]
pub struct ValueCollector {
    pub(crate) values: Vec<ExtractedValue>,
}

impl ValueCollector {
    /// Returns the collected values.
    #[must_use]
    pub fn into_values(self) -> Vec<ExtractedValue> {
        self.values
    }
}

impl ValueReceiver for ValueCollector {
    fn value(&mut self, node_name: Option<&str>, value: Value) {
        self.values.push(ExtractedValue {
            node_name: node_name.map(str::to_owned),
            iterable: false,
            index: None,
            key: None,
            value,
        });
    }

    fn iterable_value(&mut self, node_name: &str, value: Value) {
        self.values.push(ExtractedValue {
            node_name: Some(node_name.to_owned()),
            iterable: true,
            index: None,
            key: None,
            value,
        });
    }

    fn indexed_value(&mut self, node_name: &str, index: usize, value: Value) {
        self.values.push(ExtractedValue {
            node_name: Some(node_name.to_owned()),
            iterable: true,
            index: Some(index),
            key: None,
            value,
        });
    }

    fn keyed_value(&mut self, node_name: &str, key: Value, value: Value) {
        self.values.push(ExtractedValue {
            node_name: Some(node_name.to_owned()),
            iterable: true,
            index: None,
            key: Some(key),
            value,
        });
    }
}
