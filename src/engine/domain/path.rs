//! Property paths from the validated root to a violating value.

use crate::model::{TypeName, Value};
use std::fmt;

/// Kind of element a path node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The bean itself; used by class-level constraints.
    Bean,
    /// A property.
    Property,
    /// A validated method.
    Method,
    /// A method parameter.
    Parameter,
    /// A method return value.
    ReturnValue,
    /// A value held by a container.
    ContainerElement,
}

/// Node name of return values.
pub const RETURN_VALUE_NODE: &str = "<return value>";

/// One step of a [`PropertyPath`].
///
/// Container element nodes record which container type and type argument
/// were descended into, plus the position or key of the element.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    kind: NodeKind,
    name: Option<String>,
    in_iterable: bool,
    index: Option<usize>,
    key: Option<Value>,
    container_type: Option<TypeName>,
    type_argument: Option<usize>,
    type_parameter: Option<String>,
}

impl PathNode {
    fn of_kind(kind: NodeKind, name: Option<String>) -> Self {
        Self {
            kind,
            name,
            in_iterable: false,
            index: None,
            key: None,
            container_type: None,
            type_argument: None,
            type_parameter: None,
        }
    }

    /// Creates the node of a class-level constraint.
    #[must_use]
    pub fn bean() -> Self {
        Self::of_kind(NodeKind::Bean, None)
    }

    /// Creates a property node.
    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self::of_kind(NodeKind::Property, Some(name.into()))
    }

    /// Creates a method node.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self::of_kind(NodeKind::Method, Some(name.into()))
    }

    /// Creates a parameter node; `position` is the parameter index.
    #[must_use]
    pub fn parameter(name: impl Into<String>, position: usize) -> Self {
        let mut node = Self::of_kind(NodeKind::Parameter, Some(name.into()));
        node.index = Some(position);
        node
    }

    /// Creates a return value node.
    #[must_use]
    pub fn return_value() -> Self {
        Self::of_kind(NodeKind::ReturnValue, Some(RETURN_VALUE_NODE.to_owned()))
    }

    /// Creates a container element node for type argument `type_argument`
    /// of `container`.
    #[must_use]
    pub fn container_element(container: impl Into<TypeName>, type_argument: usize) -> Self {
        let mut node = Self::of_kind(NodeKind::ContainerElement, None);
        node.container_type = Some(container.into());
        node.type_argument = Some(type_argument);
        node
    }

    /// Sets the element node name, e.g. `<list element>`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the element as living in an iterable container.
    #[must_use]
    pub const fn in_iterable(mut self) -> Self {
        self.in_iterable = true;
        self
    }

    /// Sets the element position; implies [`PathNode::in_iterable`].
    #[must_use]
    pub const fn at_index(mut self, index: usize) -> Self {
        self.in_iterable = true;
        self.index = Some(index);
        self
    }

    /// Sets the element key; implies [`PathNode::in_iterable`].
    #[must_use]
    pub fn at_key(mut self, key: impl Into<Value>) -> Self {
        self.in_iterable = true;
        self.key = Some(key.into());
        self
    }

    /// Records the type parameter name of a container with several parameters.
    #[must_use]
    pub fn with_type_parameter(mut self, type_parameter: impl Into<String>) -> Self {
        self.type_parameter = Some(type_parameter.into());
        self
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the node name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` when the node is an element of an iterable container.
    #[must_use]
    pub const fn is_in_iterable(&self) -> bool {
        self.in_iterable
    }

    /// Returns the element position, or the parameter index of parameter nodes.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns the element key.
    #[must_use]
    pub const fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Returns the container type descended into.
    #[must_use]
    pub const fn container_type(&self) -> Option<&TypeName> {
        self.container_type.as_ref()
    }

    /// Returns the type argument descended into.
    #[must_use]
    pub const fn type_argument(&self) -> Option<usize> {
        self.type_argument
    }

    /// Returns the type parameter name, recorded for containers with
    /// several type parameters.
    #[must_use]
    pub fn type_parameter(&self) -> Option<&str> {
        self.type_parameter.as_deref()
    }
}

/// Path from the validated root to a value.
///
/// Renders as dotted property names with container coordinates appended,
/// e.g. `addresses[0].street` or `owners<K>[key].name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPath {
    nodes: Vec<PathNode>,
}

impl PropertyPath {
    /// Creates the empty root path.
    #[must_use]
    pub const fn root() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Returns a copy extended by `node`.
    #[must_use]
    pub fn with(&self, node: PathNode) -> Self {
        let mut extended = self.clone();
        extended.nodes.push(node);
        extended
    }

    /// Appends a node.
    pub fn push(&mut self, node: PathNode) {
        self.nodes.push(node);
    }

    /// Returns the nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Returns the last node.
    #[must_use]
    pub fn leaf(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` when one path is a prefix of the other, in either
    /// direction. The root path is related to every path.
    #[must_use]
    pub fn is_related_to(&self, other: &Self) -> bool {
        self.nodes
            .iter()
            .zip(&other.nodes)
            .all(|(mine, theirs)| mine == theirs)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut empty = true;
        for node in &self.nodes {
            match node.kind {
                NodeKind::Bean => {}
                NodeKind::ContainerElement => {
                    if let Some(parameter) = &node.type_parameter {
                        write!(f, "<{parameter}>")?;
                    }
                    if let Some(index) = node.index {
                        write!(f, "[{index}]")?;
                    } else if let Some(key) = &node.key {
                        write!(f, "[{key}]")?;
                    } else if node.in_iterable {
                        f.write_str("[]")?;
                    }
                    empty = false;
                }
                NodeKind::Property
                | NodeKind::Method
                | NodeKind::Parameter
                | NodeKind::ReturnValue => {
                    if let Some(name) = &node.name {
                        if !empty {
                            f.write_str(".")?;
                        }
                        f.write_str(name)?;
                        empty = false;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Element selector of a textual path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `[]`: an element of an unordered container.
    Iterable,
    /// `[3]`: the element at a position.
    Index(usize),
    /// `[key]`: the entry with the given key.
    Key(String),
}

/// One dotted segment of a textual property path such as `orders[0].total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Property name.
    pub name: String,
    /// Optional element selector.
    pub selector: Option<Selector>,
}

impl PathSegment {
    /// Parses a dotted property path.
    ///
    /// Returns `None` for empty paths, empty segments and malformed
    /// selectors.
    #[must_use]
    pub fn parse_all(path: &str) -> Option<Vec<Self>> {
        if path.is_empty() {
            return None;
        }
        path.split('.').map(Self::parse).collect()
    }

    fn parse(segment: &str) -> Option<Self> {
        let (name, selector) = match segment.split_once('[') {
            None => (segment, None),
            Some((name, rest)) => {
                let inner = rest.strip_suffix(']')?;
                if inner.contains(['[', ']']) {
                    return None;
                }
                let selector = if inner.is_empty() {
                    Selector::Iterable
                } else {
                    inner
                        .parse::<usize>()
                        .map_or_else(|_| Selector::Key(inner.to_owned()), Selector::Index)
                };
                (name, Some(selector))
            }
        };
        if name.is_empty() || name.contains([']', '<', '>']) {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            selector,
        })
    }
}
