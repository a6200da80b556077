//! Runtime values: scalars, shared beans and containers.

use super::{TypeName, well_known};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A value in a validated object graph.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Point in time.
    Instant(DateTime<Utc>),
    /// Shared bean instance, compared by identity.
    Bean(BeanRef),
    /// Container holding further values.
    Container(Arc<ContainerValue>),
}

impl Value {
    /// Creates a `List` container.
    #[must_use]
    pub fn list(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::container(
            well_known::LIST,
            ContainerContent::Sequence(elements.into_iter().collect()),
        )
    }

    /// Creates a `Set` container.
    #[must_use]
    pub fn set(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::container(
            well_known::SET,
            ContainerContent::Sequence(elements.into_iter().collect()),
        )
    }

    /// Creates an `Array` container.
    #[must_use]
    pub fn array(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::container(
            well_known::ARRAY,
            ContainerContent::Sequence(elements.into_iter().collect()),
        )
    }

    /// Creates a `Map` container from key/value entries.
    #[must_use]
    pub fn map(entries: impl IntoIterator<Item = (Self, Self)>) -> Self {
        Self::container(
            well_known::MAP,
            ContainerContent::Entries(entries.into_iter().collect()),
        )
    }

    /// Creates an `Optional` container.
    #[must_use]
    pub fn optional(content: Option<Self>) -> Self {
        Self::container(well_known::OPTIONAL, ContainerContent::Single(content))
    }

    /// Creates a container of an arbitrary runtime type.
    #[must_use]
    pub fn container(type_name: impl Into<TypeName>, content: ContainerContent) -> Self {
        Self::Container(Arc::new(ContainerValue {
            type_name: type_name.into(),
            content,
        }))
    }

    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the runtime type, or `None` for null.
    #[must_use]
    pub fn runtime_type(&self) -> Option<TypeName> {
        let name = match self {
            Self::Null => return None,
            Self::Bool(_) => well_known::BOOLEAN,
            Self::Int(_) => well_known::INTEGER,
            Self::Float(_) => well_known::DOUBLE,
            Self::Text(_) => well_known::STRING,
            Self::Instant(_) => well_known::INSTANT,
            Self::Bean(bean) => return Some(bean.class().clone()),
            Self::Container(container) => return Some(container.type_name.clone()),
        };
        Some(TypeName::new(name))
    }

    /// Returns the bean when this value is one.
    #[must_use]
    pub const fn as_bean(&self) -> Option<&BeanRef> {
        match self {
            Self::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Returns the container when this value is one.
    #[must_use]
    pub fn as_container(&self) -> Option<&ContainerValue> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Renders the value as JSON for message interpolation.
    ///
    /// Beans render as their display form; map entries as `[key, value]` pairs.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(flag) => serde_json::Value::Bool(*flag),
            Self::Int(number) => serde_json::Value::from(*number),
            Self::Float(number) => serde_json::Value::from(*number),
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Instant(instant) => serde_json::Value::String(instant.to_rfc3339()),
            Self::Bean(bean) => serde_json::Value::String(bean.to_string()),
            Self::Container(container) => match &container.content {
                ContainerContent::Sequence(elements) => {
                    elements.iter().map(Self::to_json).collect()
                }
                ContainerContent::Entries(entries) => entries
                    .iter()
                    .map(|(key, value)| serde_json::json!([key.to_json(), value.to_json()]))
                    .collect(),
                ContainerContent::Single(content) => {
                    content.as_ref().map_or(serde_json::Value::Null, Self::to_json)
                }
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left.to_bits() == right.to_bits(),
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Instant(left), Self::Instant(right)) => left == right,
            (Self::Bean(left), Self::Bean(right)) => left.ptr_eq(right),
            (Self::Container(left), Self::Container(right)) => {
                Arc::ptr_eq(left, right) || left == right
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{number}"),
            Self::Float(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::Bean(bean) => write!(f, "{bean}"),
            Self::Container(container) => write!(f, "{}", container.type_name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<BeanRef> for Value {
    fn from(value: BeanRef) -> Self {
        Self::Bean(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A container value and its runtime type.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerValue {
    type_name: TypeName,
    content: ContainerContent,
}

impl ContainerValue {
    /// Returns the runtime container type.
    #[must_use]
    pub const fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Returns the held values.
    #[must_use]
    pub const fn content(&self) -> &ContainerContent {
        &self.content
    }
}

/// Storage shapes of container values.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerContent {
    /// Ordered elements (lists, sets, arrays).
    Sequence(Vec<Value>),
    /// Key/value entries in insertion order.
    Entries(Vec<(Value, Value)>),
    /// At most one value.
    Single(Option<Value>),
}

/// Bean instance: a runtime class plus named property values.
#[derive(Debug)]
struct Bean {
    class: TypeName,
    properties: RwLock<BTreeMap<String, Value>>,
}

/// Shared handle to a bean.
///
/// Properties are interior-mutable so that cyclic graphs can be wired
/// after construction. Equality is identity.
#[derive(Clone)]
pub struct BeanRef(Arc<Bean>);

impl BeanRef {
    /// Creates a bean of the given runtime class with no properties set.
    #[must_use]
    pub fn new(class: impl Into<TypeName>) -> Self {
        Self(Arc::new(Bean {
            class: class.into(),
            properties: RwLock::new(BTreeMap::new()),
        }))
    }

    /// Sets a property, returning the bean.
    #[must_use]
    pub fn with(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Sets a property.
    pub fn set(&self, property: impl Into<String>, value: impl Into<Value>) {
        let mut properties = self
            .0
            .properties
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        properties.insert(property.into(), value.into());
    }

    /// Returns a property value; unset properties read as `None`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<Value> {
        self.0
            .properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(property)
            .cloned()
    }

    /// Returns a property value, treating unset properties as null.
    #[must_use]
    pub fn value_of(&self, property: &str) -> Value {
        self.get(property).unwrap_or(Value::Null)
    }

    /// Returns the runtime class.
    #[must_use]
    pub fn class(&self) -> &TypeName {
        &self.0.class
    }

    /// Returns an identity token unique among live beans.
    #[must_use]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Returns `true` when both handles point at the same bean.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for BeanRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for BeanRef {}

impl fmt::Debug for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeanRef({self})")
    }
}

impl fmt::Display for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.0.class, self.identity())
    }
}
