//! Per-type model of constrained elements, built once per declaring type.

use super::declaration::Signature;
use super::descriptor::{ConstraintDescriptor, DefinedOn};
use crate::model::{TypeName, TypeRef};
use std::sync::Arc;

/// Where a constraint was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintLocation {
    /// On the type itself.
    Type {
        /// Declaring type.
        bean: TypeName,
    },
    /// On a field.
    Field {
        /// Declaring type.
        bean: TypeName,
        /// Property name.
        property: String,
    },
    /// On a getter.
    Getter {
        /// Declaring type.
        bean: TypeName,
        /// Property name derived from the accessor.
        property: String,
    },
    /// On a method parameter.
    Parameter {
        /// Declaring type.
        bean: TypeName,
        /// Method signature.
        method: Signature,
        /// Parameter position.
        index: usize,
    },
    /// On a method return value.
    ReturnValue {
        /// Declaring type.
        bean: TypeName,
        /// Method signature.
        method: Signature,
    },
}

impl ConstraintLocation {
    /// Returns the type the constraint was declared on.
    #[must_use]
    pub const fn declaring_type(&self) -> &TypeName {
        match self {
            Self::Type { bean }
            | Self::Field { bean, .. }
            | Self::Getter { bean, .. }
            | Self::Parameter { bean, .. }
            | Self::ReturnValue { bean, .. } => bean,
        }
    }
}

/// One step from a container into one of its type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStep {
    /// Declared container type.
    pub container: TypeName,
    /// Type argument index.
    pub type_argument: usize,
    /// Type parameter name, recorded when the container has several parameters.
    pub type_parameter: Option<String>,
    /// Declared type of the extracted elements.
    pub element_type: TypeRef,
}

/// A constraint descriptor bound to its declaration site.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaConstraint {
    descriptor: Arc<ConstraintDescriptor>,
    location: ConstraintLocation,
    element_path: Vec<ContainerStep>,
    value_type: TypeRef,
}

impl MetaConstraint {
    /// Binds a descriptor to a location. `element_path` is empty unless the
    /// constraint targets container elements; `value_type` is the declared
    /// type of the constrained value.
    #[must_use]
    pub const fn new(
        descriptor: Arc<ConstraintDescriptor>,
        location: ConstraintLocation,
        element_path: Vec<ContainerStep>,
        value_type: TypeRef,
    ) -> Self {
        Self {
            descriptor,
            location,
            element_path,
            value_type,
        }
    }

    /// Returns a copy with the descriptor adapted to its place in a hierarchy.
    #[must_use]
    pub fn adapted(&self, defined_on: DefinedOn, implicit_group: Option<&TypeName>) -> Self {
        Self {
            descriptor: Arc::new(self.descriptor.adapt_to_hierarchy(defined_on, implicit_group)),
            ..self.clone()
        }
    }

    /// Returns the descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &Arc<ConstraintDescriptor> {
        &self.descriptor
    }

    /// Returns the declaration site.
    #[must_use]
    pub const fn location(&self) -> &ConstraintLocation {
        &self.location
    }

    /// Returns the container steps leading to the constrained values.
    #[must_use]
    pub fn element_path(&self) -> &[ContainerStep] {
        &self.element_path
    }

    /// Returns the declared type of the constrained value.
    #[must_use]
    pub const fn value_type(&self) -> &TypeRef {
        &self.value_type
    }
}

/// A cascade target: the whole value when `steps` is empty, otherwise the
/// values reached through the container steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascadable {
    /// Container steps to the cascaded values.
    pub steps: Vec<ContainerStep>,
}

impl Cascadable {
    /// Cascades into the whole value.
    #[must_use]
    pub const fn whole() -> Self {
        Self { steps: Vec::new() }
    }
}

/// Constraints and cascades on one value (property, parameter or return value).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedValue {
    /// Declared type of the value.
    pub declared_type: TypeRef,
    /// Constraints on the value or its container elements.
    pub constraints: Vec<MetaConstraint>,
    /// Cascade targets.
    pub cascades: Vec<Cascadable>,
}

impl ConstrainedValue {
    /// Creates an unconstrained value of the given declared type.
    #[must_use]
    pub const fn new(declared_type: TypeRef) -> Self {
        Self {
            declared_type,
            constraints: Vec::new(),
            cascades: Vec::new(),
        }
    }

    /// Returns `true` when the value is cascaded.
    #[must_use]
    pub fn is_cascading(&self) -> bool {
        !self.cascades.is_empty()
    }

    /// Returns `true` when the value has constraints or cascades.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        !self.constraints.is_empty() || self.is_cascading()
    }

    /// Merges another declaration of the same value, adapting its constraints.
    pub fn merge(&mut self, other: &Self, defined_on: DefinedOn, implicit_group: Option<&TypeName>) {
        self.constraints.extend(
            other
                .constraints
                .iter()
                .map(|constraint| constraint.adapted(defined_on, implicit_group)),
        );
        for cascade in &other.cascades {
            if !self.cascades.contains(cascade) {
                self.cascades.push(cascade.clone());
            }
        }
    }
}

/// A constrained field or getter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedProperty {
    /// Logical property name.
    pub name: String,
    /// Constraints and cascades.
    pub value: ConstrainedValue,
}

/// A constrained method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedParameter {
    /// Parameter name.
    pub name: String,
    /// Constraints and cascades.
    pub value: ConstrainedValue,
}

/// A method with constrained parameters or return value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedExecutable {
    /// Method signature.
    pub signature: Signature,
    /// Parameters in order.
    pub parameters: Vec<ConstrainedParameter>,
    /// Return value.
    pub return_value: ConstrainedValue,
}

impl ConstrainedExecutable {
    /// Returns `true` when any parameter is constrained or cascaded.
    #[must_use]
    pub fn has_parameter_constraints(&self) -> bool {
        self.parameters
            .iter()
            .any(|parameter| parameter.value.is_constrained())
    }
}

/// A constrained element of one declaring type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstrainedElement {
    /// Class-level constraints.
    Type(Vec<MetaConstraint>),
    /// A field.
    Field(ConstrainedProperty),
    /// A getter.
    Getter(ConstrainedProperty),
    /// A method with parameters and return value.
    Executable(ConstrainedExecutable),
}

/// The constrained elements declared directly on one type.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanConfiguration {
    /// Declaring type.
    pub bean_type: TypeName,
    /// Constrained elements in declaration order.
    pub elements: Vec<ConstrainedElement>,
    /// Redefined default group sequence, if any.
    pub default_group_sequence: Option<Vec<TypeName>>,
}
