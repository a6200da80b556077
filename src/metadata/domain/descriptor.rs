//! Immutable description of one constraint occurrence.

use super::definition::{CheckingUnitId, CompositionType};
use crate::model::TypeName;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Whether a constraint was declared on the validated type itself or inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinedOn {
    /// Declared on the validated type.
    Locally,
    /// Declared on a supertype or implemented interface.
    InHierarchy,
}

/// Kind of element a constraint is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Class-level constraint.
    Type,
    /// Field constraint.
    Field,
    /// Getter constraint.
    Method,
    /// Method parameter constraint.
    Parameter,
    /// Method return value constraint.
    ReturnValue,
    /// Constraint on a container element.
    ContainerElement,
}

/// Resolved constraint: attributes, groups, payload, checking units and
/// composing constraints.
///
/// Composing descriptors are owned by their parent and carry the parent's
/// groups and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDescriptor {
    id: u64,
    constraint_type: TypeName,
    attributes: BTreeMap<String, JsonValue>,
    message_template: String,
    groups: BTreeSet<TypeName>,
    payload: BTreeSet<TypeName>,
    checking_units: Vec<CheckingUnitId>,
    composing: Vec<Arc<ConstraintDescriptor>>,
    report_as_single_violation: bool,
    composition: CompositionType,
    defined_on: DefinedOn,
    element_kind: ElementKind,
}

/// Parts of a [`ConstraintDescriptor`] assembled by the descriptor factory.
#[derive(Debug, Clone)]
pub struct DescriptorParts {
    /// Unique identifier.
    pub id: u64,
    /// Constraint type.
    pub constraint_type: TypeName,
    /// Resolved attribute values.
    pub attributes: BTreeMap<String, JsonValue>,
    /// Message template.
    pub message_template: String,
    /// Validation groups.
    pub groups: BTreeSet<TypeName>,
    /// Payload markers.
    pub payload: BTreeSet<TypeName>,
    /// Candidate checking units.
    pub checking_units: Vec<CheckingUnitId>,
    /// Composing descriptors.
    pub composing: Vec<Arc<ConstraintDescriptor>>,
    /// Collapse composing failures into one violation.
    pub report_as_single_violation: bool,
    /// Composition type.
    pub composition: CompositionType,
    /// Element kind.
    pub element_kind: ElementKind,
}

impl ConstraintDescriptor {
    /// Assembles a descriptor defined locally.
    #[must_use]
    pub fn from_parts(parts: DescriptorParts) -> Self {
        Self {
            id: parts.id,
            constraint_type: parts.constraint_type,
            attributes: parts.attributes,
            message_template: parts.message_template,
            groups: parts.groups,
            payload: parts.payload,
            checking_units: parts.checking_units,
            composing: parts.composing,
            report_as_single_violation: parts.report_as_single_violation,
            composition: parts.composition,
            defined_on: DefinedOn::Locally,
            element_kind: parts.element_kind,
        }
    }

    /// Returns a copy tagged with its provenance in a validated hierarchy.
    ///
    /// When `implicit_group` is given and the groups contain `Default`, the
    /// implicit group is added, recursively for composing constraints.
    #[must_use]
    pub fn adapt_to_hierarchy(
        &self,
        defined_on: DefinedOn,
        implicit_group: Option<&TypeName>,
    ) -> Self {
        let mut adapted = self.clone();
        adapted.defined_on = defined_on;
        if let Some(group) = implicit_group
            && adapted.groups.iter().any(TypeName::is_default_group)
        {
            adapted.groups.insert(group.clone());
        }
        adapted.composing = self
            .composing
            .iter()
            .map(|child| Arc::new(child.adapt_to_hierarchy(defined_on, implicit_group)))
            .collect();
        adapted
    }

    /// Returns the identifier shared by every copy of this descriptor.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the constraint type.
    #[must_use]
    pub const fn constraint_type(&self) -> &TypeName {
        &self.constraint_type
    }

    /// Returns every resolved attribute, including `message`, `groups` and `payload`.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, JsonValue> {
        &self.attributes
    }

    /// Returns one attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&JsonValue> {
        self.attributes.get(name)
    }

    /// Returns the message template.
    #[must_use]
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// Returns the validation groups; never empty.
    #[must_use]
    pub const fn groups(&self) -> &BTreeSet<TypeName> {
        &self.groups
    }

    /// Returns `true` when the constraint applies to `group`.
    #[must_use]
    pub fn applies_to(&self, group: &TypeName) -> bool {
        self.groups.contains(group)
    }

    /// Returns the payload markers.
    #[must_use]
    pub const fn payload(&self) -> &BTreeSet<TypeName> {
        &self.payload
    }

    /// Returns the candidate checking units.
    #[must_use]
    pub fn checking_units(&self) -> &[CheckingUnitId] {
        &self.checking_units
    }

    /// Returns the composing descriptors.
    #[must_use]
    pub fn composing(&self) -> &[Arc<Self>] {
        &self.composing
    }

    /// Returns whether composing failures collapse into one violation.
    #[must_use]
    pub const fn report_as_single_violation(&self) -> bool {
        self.report_as_single_violation
    }

    /// Returns the composition type.
    #[must_use]
    pub const fn composition(&self) -> CompositionType {
        self.composition
    }

    /// Returns the provenance.
    #[must_use]
    pub const fn defined_on(&self) -> DefinedOn {
        self.defined_on
    }

    /// Returns the element kind.
    #[must_use]
    pub const fn element_kind(&self) -> ElementKind {
        self.element_kind
    }
}
