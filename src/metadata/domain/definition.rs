//! Constraint definitions (the "annotation types") and their uses.

use crate::model::TypeName;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute holding the message template.
pub const MESSAGE_ATTRIBUTE: &str = "message";
/// Attribute holding the validation groups.
pub const GROUPS_ATTRIBUTE: &str = "groups";
/// Attribute holding the payload markers.
pub const PAYLOAD_ATTRIBUTE: &str = "payload";

/// Identifier of a checking unit implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckingUnitId(String);

impl CheckingUnitId {
    /// Creates a checking unit identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckingUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CheckingUnitId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Declared type of a constraint attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// A string.
    Text,
    /// An integral number.
    Integer,
    /// Any number.
    Decimal,
    /// A boolean.
    Boolean,
    /// A list of type names.
    TypeList,
    /// A list of strings.
    TextList,
}

impl AttributeKind {
    /// Returns `true` when `value` is a valid value of this kind.
    #[must_use]
    pub fn accepts(self, value: &JsonValue) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Decimal => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::TypeList | Self::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(JsonValue::is_string)),
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "an integer",
            Self::Decimal => "a number",
            Self::Boolean => "a boolean",
            Self::TypeList => "a list of types",
            Self::TextList => "a list of strings",
        };
        f.write_str(name)
    }
}

/// Marks an attribute as overriding an attribute of a composing constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOverride {
    /// Composing constraint type whose attribute is overridden.
    pub constraint: TypeName,
    /// Name of the overridden attribute.
    pub attribute: String,
    /// 1-based position within a multi-valued composition; `None` targets every match.
    #[serde(default)]
    pub index: Option<usize>,
}

impl AttributeOverride {
    /// Overrides `attribute` on every composing constraint of type `constraint`.
    #[must_use]
    pub fn new(constraint: impl Into<TypeName>, attribute: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
            attribute: attribute.into(),
            index: None,
        }
    }

    /// Restricts the override to one position of a multi-valued composition.
    #[must_use]
    pub const fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// An attribute declared by a constraint definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name.
    pub name: String,
    /// Attribute type.
    pub kind: AttributeKind,
    /// Default value used when a declaration omits the attribute.
    #[serde(default)]
    pub default: Option<JsonValue>,
    /// Composing constraint attributes this attribute overrides.
    #[serde(default)]
    pub overrides: Vec<AttributeOverride>,
}

impl AttributeDefinition {
    /// Declares an attribute without default.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            overrides: Vec::new(),
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<JsonValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Adds an attribute override.
    #[must_use]
    pub fn overriding(mut self, target: AttributeOverride) -> Self {
        self.overrides.push(target);
        self
    }
}

/// How the results of composing constraints combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionType {
    /// Every composing constraint must pass.
    #[default]
    And,
    /// At least one composing constraint must pass.
    Or,
    /// Every composing constraint must fail.
    AllFalse,
}

/// A constraint used inside a definition or on a declared element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintAnnotation {
    /// Constraint type.
    #[serde(rename = "constraint")]
    pub constraint_type: TypeName,
    /// Explicit attribute values.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl ConstraintAnnotation {
    /// Uses a constraint with no explicit attribute values.
    #[must_use]
    pub fn new(constraint_type: impl Into<TypeName>) -> Self {
        Self {
            constraint_type: constraint_type.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Sets an attribute value.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    /// Sets the message template.
    #[must_use]
    pub fn with_message(self, template: impl Into<String>) -> Self {
        self.with(MESSAGE_ATTRIBUTE, template.into())
    }

    /// Sets the validation groups.
    #[must_use]
    pub fn with_groups<I, T>(self, groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.with(GROUPS_ATTRIBUTE, type_list(groups))
    }

    /// Sets the payload markers.
    #[must_use]
    pub fn with_payload<I, T>(self, payload: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.with(PAYLOAD_ATTRIBUTE, type_list(payload))
    }
}

fn type_list<I, T>(types: I) -> JsonValue
where
    I: IntoIterator<Item = T>,
    T: Into<TypeName>,
{
    types
        .into_iter()
        .map(|name| JsonValue::String(name.into().as_str().to_owned()))
        .collect()
}

/// A constraint used to compose another constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposingConstraint {
    /// A single composing constraint.
    Single(ConstraintAnnotation),
    /// A multi-valued composition; positions are 1-based for overrides.
    List(Vec<ConstraintAnnotation>),
}

/// Definition of a constraint type: its attributes, checking units and composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    /// Constraint type.
    #[serde(rename = "constraint")]
    pub constraint_type: TypeName,
    /// Declared attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    /// Checking units implementing the constraint.
    #[serde(default)]
    pub validated_by: Vec<CheckingUnitId>,
    /// Constraints this constraint is composed of.
    #[serde(default)]
    pub composing: Vec<ComposingConstraint>,
    /// Whether composing failures collapse into one violation.
    #[serde(default)]
    pub report_as_single_violation: bool,
    /// How composing results combine.
    #[serde(default)]
    pub composition: CompositionType,
}

impl ConstraintDefinition {
    /// Defines a constraint with the mandatory `message`, `groups` and
    /// `payload` attributes.
    #[must_use]
    pub fn new(constraint_type: impl Into<TypeName>, message_template: impl Into<String>) -> Self {
        Self::bare(constraint_type)
            .with_attribute(
                AttributeDefinition::new(MESSAGE_ATTRIBUTE, AttributeKind::Text)
                    .with_default(message_template.into()),
            )
            .with_attribute(
                AttributeDefinition::new(GROUPS_ATTRIBUTE, AttributeKind::TypeList)
                    .with_default(JsonValue::Array(Vec::new())),
            )
            .with_attribute(
                AttributeDefinition::new(PAYLOAD_ATTRIBUTE, AttributeKind::TypeList)
                    .with_default(JsonValue::Array(Vec::new())),
            )
    }

    /// Defines a constraint without any attribute.
    #[must_use]
    pub fn bare(constraint_type: impl Into<TypeName>) -> Self {
        Self {
            constraint_type: constraint_type.into(),
            attributes: Vec::new(),
            validated_by: Vec::new(),
            composing: Vec::new(),
            report_as_single_violation: false,
            composition: CompositionType::And,
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.retain(|existing| existing.name != attribute.name);
        self.attributes.push(attribute);
        self
    }

    /// Adds a checking unit.
    #[must_use]
    pub fn validated_by(mut self, unit: impl Into<CheckingUnitId>) -> Self {
        self.validated_by.push(unit.into());
        self
    }

    /// Adds a composing constraint.
    #[must_use]
    pub fn composed_of(mut self, constraint: ConstraintAnnotation) -> Self {
        self.composing.push(ComposingConstraint::Single(constraint));
        self
    }

    /// Adds a multi-valued composing constraint.
    #[must_use]
    pub fn composed_of_list(mut self, constraints: impl IntoIterator<Item = ConstraintAnnotation>) -> Self {
        self.composing
            .push(ComposingConstraint::List(constraints.into_iter().collect()));
        self
    }

    /// Collapses composing failures into a single violation.
    #[must_use]
    pub const fn reporting_as_single_violation(mut self) -> Self {
        self.report_as_single_violation = true;
        self
    }

    /// Sets the composition type.
    #[must_use]
    pub const fn with_composition(mut self, composition: CompositionType) -> Self {
        self.composition = composition;
        self
    }

    /// Looks up an attribute definition.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }
}
