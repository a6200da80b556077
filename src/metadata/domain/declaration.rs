//! Raw constraint declarations per bean type, as supplied by a declaration feed.

use super::definition::ConstraintAnnotation;
use crate::model::{TypeName, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraints and cascades declared on one element (field, getter,
/// parameter or return value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDeclaration {
    /// Declared static type of the element.
    #[serde(rename = "type")]
    pub declared_type: TypeRef,
    /// Constraints on the whole value.
    #[serde(default)]
    pub constraints: Vec<ConstraintAnnotation>,
    /// Whether the value is validated recursively.
    #[serde(default)]
    pub cascading: bool,
    /// Constraints and cascades on type arguments.
    #[serde(default)]
    pub container_elements: Vec<ContainerElementDeclaration>,
}

impl ElementDeclaration {
    /// Declares an element of the given static type.
    #[must_use]
    pub fn new(declared_type: impl Into<TypeRef>) -> Self {
        Self {
            declared_type: declared_type.into(),
            constraints: Vec::new(),
            cascading: false,
            container_elements: Vec::new(),
        }
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: ConstraintAnnotation) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Marks the element as cascading.
    #[must_use]
    pub const fn cascading(mut self) -> Self {
        self.cascading = true;
        self
    }

    /// Adds a container element declaration.
    #[must_use]
    pub fn with_container_element(mut self, element: ContainerElementDeclaration) -> Self {
        self.container_elements.push(element);
        self
    }
}

/// Constraints and cascades on one type argument of a container type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerElementDeclaration {
    /// Index of the type argument.
    pub type_argument: usize,
    /// Constraints on the extracted values.
    #[serde(default)]
    pub constraints: Vec<ConstraintAnnotation>,
    /// Whether extracted values are validated recursively.
    #[serde(default)]
    pub cascading: bool,
    /// Declarations on the type arguments of the element type.
    #[serde(default)]
    pub nested: Vec<ContainerElementDeclaration>,
}

impl ContainerElementDeclaration {
    /// Declares type argument `type_argument`.
    #[must_use]
    pub const fn new(type_argument: usize) -> Self {
        Self {
            type_argument,
            constraints: Vec::new(),
            cascading: false,
            nested: Vec::new(),
        }
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: ConstraintAnnotation) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Marks the extracted values as cascading.
    #[must_use]
    pub const fn cascading(mut self) -> Self {
        self.cascading = true;
        self
    }

    /// Adds a nested container element declaration.
    #[must_use]
    pub fn with_nested(mut self, nested: Self) -> Self {
        self.nested.push(nested);
        self
    }
}

/// A field or getter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    /// Member name; getters use their accessor name (`getName`, `isActive`).
    pub name: String,
    /// Element declaration.
    #[serde(flatten)]
    pub element: ElementDeclaration,
}

impl MemberDeclaration {
    /// Declares a member.
    #[must_use]
    pub fn new(name: impl Into<String>, element: ElementDeclaration) -> Self {
        Self {
            name: name.into(),
            element,
        }
    }

    /// Returns the logical property name: accessor prefixes are stripped
    /// and the first letter lower-cased.
    #[must_use]
    pub fn property_name(&self) -> String {
        property_name(&self.name)
    }
}

fn property_name(accessor: &str) -> String {
    let stripped = ["get", "is"].iter().find_map(|prefix| {
        accessor
            .strip_prefix(*prefix)
            .filter(|rest| rest.chars().next().is_some_and(char::is_uppercase))
    });
    let Some(rest) = stripped else {
        return accessor.to_owned();
    };
    let mut chars = rest.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// A method parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    /// Parameter name used in property paths.
    pub name: String,
    /// Element declaration.
    #[serde(flatten)]
    pub element: ElementDeclaration,
}

impl ParameterDeclaration {
    /// Declares a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, element: ElementDeclaration) -> Self {
        Self {
            name: name.into(),
            element,
        }
    }
}

/// A method declaration with parameter and return value constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    /// Method name.
    pub name: String,
    /// Parameters in order.
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    /// Return value, if constrained.
    #[serde(default)]
    pub return_value: Option<ElementDeclaration>,
}

impl MethodDeclaration {
    /// Declares a method without parameters or return value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_value: None,
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the return value declaration.
    #[must_use]
    pub fn returning(mut self, return_value: ElementDeclaration) -> Self {
        self.return_value = Some(return_value);
        self
    }

    /// Returns the method signature.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature::new(
            self.name.clone(),
            self.parameters
                .iter()
                .map(|parameter| parameter.element.declared_type.name.clone()),
        )
    }
}

/// Method name plus parameter types; methods with equal signatures override each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    /// Method name.
    pub name: String,
    /// Parameter types.
    pub parameter_types: Vec<TypeName>,
}

impl Signature {
    /// Creates a signature.
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_types: impl IntoIterator<Item = TypeName>) -> Self {
        Self {
            name: name.into(),
            parameter_types: parameter_types.into_iter().collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters = self
            .parameter_types
            .iter()
            .map(TypeName::as_str)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}({parameters})", self.name)
    }
}

/// Every declaration made directly on one bean type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanDeclaration {
    /// Declaring type.
    #[serde(rename = "type")]
    pub bean_type: TypeName,
    /// Class-level constraints.
    #[serde(default)]
    pub class_constraints: Vec<ConstraintAnnotation>,
    /// Field declarations.
    #[serde(default)]
    pub fields: Vec<MemberDeclaration>,
    /// Getter declarations.
    #[serde(default)]
    pub getters: Vec<MemberDeclaration>,
    /// Method declarations.
    #[serde(default)]
    pub methods: Vec<MethodDeclaration>,
    /// Redefined default group sequence; must name the bean type once.
    #[serde(default)]
    pub default_group_sequence: Option<Vec<TypeName>>,
}

impl BeanDeclaration {
    /// Starts an empty declaration for a bean type.
    #[must_use]
    pub fn new(bean_type: impl Into<TypeName>) -> Self {
        Self {
            bean_type: bean_type.into(),
            class_constraints: Vec::new(),
            fields: Vec::new(),
            getters: Vec::new(),
            methods: Vec::new(),
            default_group_sequence: None,
        }
    }

    /// Adds a class-level constraint.
    #[must_use]
    pub fn with_class_constraint(mut self, constraint: ConstraintAnnotation) -> Self {
        self.class_constraints.push(constraint);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, element: ElementDeclaration) -> Self {
        self.fields.push(MemberDeclaration::new(name, element));
        self
    }

    /// Adds a getter.
    #[must_use]
    pub fn with_getter(mut self, name: impl Into<String>, element: ElementDeclaration) -> Self {
        self.getters.push(MemberDeclaration::new(name, element));
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: MethodDeclaration) -> Self {
        self.methods.push(method);
        self
    }

    /// Redefines the default group sequence.
    #[must_use]
    pub fn with_default_group_sequence<I, T>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.default_group_sequence = Some(groups.into_iter().map(Into::into).collect());
        self
    }
}
