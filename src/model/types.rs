//! Type names, generic type references and type declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the types every [`super::TypeSystem`] knows about.
pub mod well_known {
    /// Root of every class hierarchy.
    pub const OBJECT: &str = "Object";
    /// The implicit default validation group.
    pub const DEFAULT: &str = "Default";
    /// Character sequence capability.
    pub const CHAR_SEQUENCE: &str = "CharSequence";
    /// Text values.
    pub const STRING: &str = "String";
    /// Numeric capability.
    pub const NUMBER: &str = "Number";
    /// Integral numbers.
    pub const INTEGER: &str = "Integer";
    /// Floating point numbers.
    pub const DOUBLE: &str = "Double";
    /// Boolean values.
    pub const BOOLEAN: &str = "Boolean";
    /// Points in time.
    pub const INSTANT: &str = "Instant";
    /// Iterable containers.
    pub const ITERABLE: &str = "Iterable";
    /// Sized collections.
    pub const COLLECTION: &str = "Collection";
    /// Ordered, indexed collections.
    pub const LIST: &str = "List";
    /// Unordered collections without duplicates.
    pub const SET: &str = "Set";
    /// Key to value associations.
    pub const MAP: &str = "Map";
    /// Optional single-value wrapper.
    pub const OPTIONAL: &str = "Optional";
    /// Fixed-size arrays.
    pub const ARRAY: &str = "Array";
}

/// Fully qualified name of a type known to the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the root `Object` type.
    #[must_use]
    pub fn object() -> Self {
        Self::new(well_known::OBJECT)
    }

    /// Returns the implicit `Default` group.
    #[must_use]
    pub fn default_group() -> Self {
        Self::new(well_known::DEFAULT)
    }

    /// Returns `true` when this is the `Default` group.
    #[must_use]
    pub fn is_default_group(&self) -> bool {
        self.0 == well_known::DEFAULT
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Whether a declared type is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A concrete or abstract class.
    Class,
    /// An interface; constraints declared on it gain an implicit group.
    Interface,
}

/// A possibly parameterised type as written in a member declaration,
/// e.g. `Map<Address, Integer>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Raw type name.
    pub name: TypeName,
    /// Concrete type arguments, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// Creates a raw type reference without type arguments.
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Creates a parameterised type reference.
    #[must_use]
    pub fn generic(name: impl Into<TypeName>, arguments: impl IntoIterator<Item = Self>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    /// Returns the argument at `index`, or `Object` when the reference is raw.
    #[must_use]
    pub fn argument(&self, index: usize) -> Self {
        self.arguments
            .get(index)
            .cloned()
            .unwrap_or_else(|| Self::new(TypeName::object()))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.arguments.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (position, argument) in self.arguments.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(">")
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Argument passed to a generic supertype in a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeArgument {
    /// One of the declaring type's own type parameters.
    Variable(String),
    /// A fixed type.
    Concrete(TypeRef),
}

/// A generic supertype reference, e.g. `Collection<E>` in `List<E> extends Collection<E>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperType {
    /// Name of the supertype.
    pub name: TypeName,
    /// Arguments bound to the supertype's parameters.
    #[serde(default)]
    pub arguments: Vec<TypeArgument>,
}

impl SuperType {
    /// Creates a supertype reference without arguments.
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Binds the next supertype parameter to a type variable of the declaring type.
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.arguments.push(TypeArgument::Variable(variable.into()));
        self
    }

    /// Binds the next supertype parameter to a concrete type.
    #[must_use]
    pub fn with_concrete(mut self, argument: TypeRef) -> Self {
        self.arguments.push(TypeArgument::Concrete(argument));
        self
    }
}

/// Declaration of a type: its kind, type parameters and direct supertypes.
///
/// Group types may additionally define a group sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Name of the declared type.
    pub name: TypeName,
    /// Class or interface.
    pub kind: TypeKind,
    /// Names of the type parameters, in order.
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Direct superclass, if any.
    #[serde(default)]
    pub superclass: Option<SuperType>,
    /// Directly implemented or extended interfaces.
    #[serde(default)]
    pub interfaces: Vec<SuperType>,
    /// Ordered groups when this type is a group sequence.
    #[serde(default)]
    pub group_sequence: Option<Vec<TypeName>>,
}

impl TypeDecl {
    /// Declares a class.
    #[must_use]
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    /// Declares an interface.
    #[must_use]
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    /// Declares a group sequence interface.
    #[must_use]
    pub fn group_sequence(
        name: impl Into<TypeName>,
        groups: impl IntoIterator<Item = TypeName>,
    ) -> Self {
        let mut declaration = Self::interface(name);
        declaration.group_sequence = Some(groups.into_iter().collect());
        declaration
    }

    fn with_kind(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            group_sequence: None,
        }
    }

    /// Sets the type parameters.
    #[must_use]
    pub fn with_type_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extending(mut self, superclass: impl Into<SuperType>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implementing(mut self, interface: impl Into<SuperType>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Returns every direct supertype, interfaces first.
    pub fn supertypes(&self) -> impl Iterator<Item = &SuperType> {
        self.interfaces.iter().chain(self.superclass.iter())
    }
}

impl From<&str> for SuperType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<TypeName> for SuperType {
    fn from(value: TypeName) -> Self {
        Self::new(value)
    }
}
