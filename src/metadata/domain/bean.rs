//! Aggregated metadata of a validated type and its read-only descriptors.

use super::declaration::Signature;
use super::descriptor::ConstraintDescriptor;
use super::element::{ConstrainedValue, MetaConstraint};
use crate::metadata::error::{DefinitionError, DefinitionResult};
use crate::model::{TypeName, TypeRef};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Merged constraints of one logical property across fields and getters of
/// the whole hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMetaData {
    /// Property name.
    pub name: String,
    /// Constraints and cascades.
    pub value: ConstrainedValue,
}

/// Merged metadata of one method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetaData {
    /// Parameter name.
    pub name: String,
    /// Constraints and cascades.
    pub value: ConstrainedValue,
}

/// Merged metadata of every method sharing one signature in a hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableMetaData {
    /// Method signature.
    pub signature: Signature,
    /// Parameters in order.
    pub parameters: Vec<ParameterMetaData>,
    /// Return value.
    pub return_value: ConstrainedValue,
    /// Overriding rule violation, raised when the method is validated.
    pub deferred_error: Option<DefinitionError>,
}

impl ExecutableMetaData {
    /// Returns the method metadata, or the deferred overriding error.
    ///
    /// # Errors
    ///
    /// Returns the [`DefinitionError`] recorded during aggregation.
    pub fn checked(&self) -> DefinitionResult<&Self> {
        self.deferred_error
            .as_ref()
            .map_or(Ok(self), |error| Err(error.clone()))
    }
}

/// Aggregated constraint metadata of one type across its hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanMetaData {
    bean_type: TypeName,
    hierarchy: Vec<TypeName>,
    class_constraints: Vec<MetaConstraint>,
    properties: BTreeMap<String, PropertyMetaData>,
    executables: BTreeMap<Signature, ExecutableMetaData>,
    default_group_sequence: Vec<TypeName>,
    redefines_default_group_sequence: bool,
}

/// Parts of a [`BeanMetaData`] assembled by the aggregator.
#[derive(Debug, Clone)]
pub struct BeanMetaDataParts {
    /// Validated type.
    pub bean_type: TypeName,
    /// Hierarchy closure, validated type first.
    pub hierarchy: Vec<TypeName>,
    /// Class-level constraints from the whole hierarchy.
    pub class_constraints: Vec<MetaConstraint>,
    /// Merged properties.
    pub properties: BTreeMap<String, PropertyMetaData>,
    /// Merged methods.
    pub executables: BTreeMap<Signature, ExecutableMetaData>,
    /// Default group sequence with the bean marker replaced by `Default`.
    pub default_group_sequence: Vec<TypeName>,
    /// Whether the default group sequence was redefined.
    pub redefines_default_group_sequence: bool,
}

impl BeanMetaData {
    /// Assembles aggregated metadata.
    #[must_use]
    pub fn from_parts(parts: BeanMetaDataParts) -> Self {
        Self {
            bean_type: parts.bean_type,
            hierarchy: parts.hierarchy,
            class_constraints: parts.class_constraints,
            properties: parts.properties,
            executables: parts.executables,
            default_group_sequence: parts.default_group_sequence,
            redefines_default_group_sequence: parts.redefines_default_group_sequence,
        }
    }

    /// Returns the validated type.
    #[must_use]
    pub const fn bean_type(&self) -> &TypeName {
        &self.bean_type
    }

    /// Returns the hierarchy closure, validated type first.
    #[must_use]
    pub fn hierarchy(&self) -> &[TypeName] {
        &self.hierarchy
    }

    /// Returns the class-level constraints.
    #[must_use]
    pub fn class_constraints(&self) -> &[MetaConstraint] {
        &self.class_constraints
    }

    /// Returns every merged property.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, PropertyMetaData> {
        &self.properties
    }

    /// Looks up a property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyMetaData> {
        self.properties.get(name)
    }

    /// Returns the properties that are cascaded.
    pub fn cascaded_properties(&self) -> impl Iterator<Item = &PropertyMetaData> {
        self.properties
            .values()
            .filter(|property| property.value.is_cascading())
    }

    /// Looks up a method by signature.
    #[must_use]
    pub fn executable(&self, signature: &Signature) -> Option<&ExecutableMetaData> {
        self.executables.get(signature)
    }

    /// Returns every merged method.
    #[must_use]
    pub const fn executables(&self) -> &BTreeMap<Signature, ExecutableMetaData> {
        &self.executables
    }

    /// Returns every constraint, grouped by declaring type.
    #[must_use]
    pub fn constraints_by_declaring_type(&self) -> BTreeMap<TypeName, Vec<&MetaConstraint>> {
        let mut grouped: BTreeMap<TypeName, Vec<&MetaConstraint>> = BTreeMap::new();
        let property_constraints = self
            .properties
            .values()
            .flat_map(|property| property.value.constraints.iter());
        for constraint in self.class_constraints.iter().chain(property_constraints) {
            grouped
                .entry(constraint.location().declaring_type().clone())
                .or_default()
                .push(constraint);
        }
        grouped
    }

    /// Returns the default group sequence; `Default` stands for the bean's own marker.
    #[must_use]
    pub fn default_group_sequence(&self) -> &[TypeName] {
        &self.default_group_sequence
    }

    /// Returns `true` when the bean redefines its default group sequence.
    #[must_use]
    pub const fn redefines_default_group_sequence(&self) -> bool {
        self.redefines_default_group_sequence
    }

    /// Returns `true` when any constraint or cascade exists.
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        !self.class_constraints.is_empty()
            || self
                .properties
                .values()
                .any(|property| property.value.is_constrained())
            || !self.executables.is_empty()
    }

    /// Builds the read-only introspection view.
    #[must_use]
    pub fn descriptor(&self) -> BeanDescriptor {
        BeanDescriptor {
            bean_type: self.bean_type.clone(),
            class_constraints: descriptors_of(&self.class_constraints),
            properties: self
                .properties
                .values()
                .filter(|property| property.value.is_constrained())
                .map(|property| (property.name.clone(), ElementDescriptor::of(&property.value)))
                .collect(),
            methods: self
                .executables
                .values()
                .map(|executable| {
                    (
                        executable.signature.to_string(),
                        MethodDescriptor {
                            parameters: executable
                                .parameters
                                .iter()
                                .map(|parameter| ElementDescriptor::of(&parameter.value))
                                .collect(),
                            return_value: ElementDescriptor::of(&executable.return_value),
                        },
                    )
                })
                .collect(),
        }
    }
}

fn descriptors_of(constraints: &[MetaConstraint]) -> Vec<Arc<ConstraintDescriptor>> {
    constraints
        .iter()
        .map(|constraint| Arc::clone(constraint.descriptor()))
        .collect()
}

/// Read-only view of one constrained element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDescriptor {
    /// Declared type.
    pub declared_type: TypeRef,
    /// Constraints on the value itself.
    pub constraints: Vec<Arc<ConstraintDescriptor>>,
    /// Constraints on container elements.
    pub container_element_constraints: Vec<Arc<ConstraintDescriptor>>,
    /// Whether the value is cascaded.
    pub cascaded: bool,
}

impl ElementDescriptor {
    fn of(value: &ConstrainedValue) -> Self {
        let (own, elements): (Vec<&MetaConstraint>, Vec<&MetaConstraint>) = value
            .constraints
            .iter()
            .partition(|constraint| constraint.element_path().is_empty());
        Self {
            declared_type: value.declared_type.clone(),
            constraints: own.into_iter().map(|c| Arc::clone(c.descriptor())).collect(),
            container_element_constraints: elements
                .into_iter()
                .map(|c| Arc::clone(c.descriptor()))
                .collect(),
            cascaded: value.is_cascading(),
        }
    }

    /// Returns `true` when the element has any constraint or cascade.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        self.cascaded
            || !self.constraints.is_empty()
            || !self.container_element_constraints.is_empty()
    }
}

/// Read-only view of a constrained method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Parameters in order.
    pub parameters: Vec<ElementDescriptor>,
    /// Return value.
    pub return_value: ElementDescriptor,
}

/// Read-only view of the aggregated constraints of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanDescriptor {
    /// Described type.
    pub bean_type: TypeName,
    /// Class-level constraints.
    pub class_constraints: Vec<Arc<ConstraintDescriptor>>,
    /// Constrained properties by name.
    pub properties: BTreeMap<String, ElementDescriptor>,
    /// Constrained methods by rendered signature.
    pub methods: BTreeMap<String, MethodDescriptor>,
}

impl BeanDescriptor {
    /// Returns `true` when the type has any constraint, cascade or constrained method.
    #[must_use]
    pub fn is_bean_constrained(&self) -> bool {
        !self.class_constraints.is_empty() || !self.properties.is_empty() || !self.methods.is_empty()
    }

    /// Looks up a constrained property.
    #[must_use]
    pub fn constraints_for_property(&self, name: &str) -> Option<&ElementDescriptor> {
        self.properties.get(name)
    }
}
