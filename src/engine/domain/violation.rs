//! Constraint violations and the violation set returned by validation.

use super::path::PropertyPath;
use crate::metadata::{ConstraintDescriptor, ElementKind};
use crate::model::{BeanRef, TypeName, Value};
use std::sync::Arc;

/// One failed constraint.
///
/// Two violations are equal when they share the root bean, property path,
/// message, message template and invalid value.
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    message: String,
    message_template: String,
    root_bean: Option<BeanRef>,
    root_bean_type: TypeName,
    leaf_bean: Option<BeanRef>,
    invalid_value: Value,
    property_path: PropertyPath,
    descriptor: Arc<ConstraintDescriptor>,
    element_kind: ElementKind,
}

/// Parts of a [`ConstraintViolation`] assembled by the validator.
#[derive(Debug, Clone)]
pub struct ViolationParts {
    /// Interpolated message.
    pub message: String,
    /// Raw message template.
    pub message_template: String,
    /// Validated root; `None` when validating a detached value.
    pub root_bean: Option<BeanRef>,
    /// Type of the validated root.
    pub root_bean_type: TypeName,
    /// Bean holding the invalid value, if any.
    pub leaf_bean: Option<BeanRef>,
    /// The value that failed.
    pub invalid_value: Value,
    /// Path from the root to the invalid value.
    pub property_path: PropertyPath,
    /// The failing constraint.
    pub descriptor: Arc<ConstraintDescriptor>,
    /// Kind of element the constraint was declared on.
    pub element_kind: ElementKind,
}

impl ConstraintViolation {
    /// Assembles a violation.
    #[must_use]
    pub fn from_parts(parts: ViolationParts) -> Self {
        Self {
            message: parts.message,
            message_template: parts.message_template,
            root_bean: parts.root_bean,
            root_bean_type: parts.root_bean_type,
            leaf_bean: parts.leaf_bean,
            invalid_value: parts.invalid_value,
            property_path: parts.property_path,
            descriptor: parts.descriptor,
            element_kind: parts.element_kind,
        }
    }

    /// Returns the interpolated message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the raw message template.
    #[must_use]
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// Returns the validated root bean.
    #[must_use]
    pub const fn root_bean(&self) -> Option<&BeanRef> {
        self.root_bean.as_ref()
    }

    /// Returns the type of the validated root.
    #[must_use]
    pub const fn root_bean_type(&self) -> &TypeName {
        &self.root_bean_type
    }

    /// Returns the bean holding the invalid value.
    #[must_use]
    pub const fn leaf_bean(&self) -> Option<&BeanRef> {
        self.leaf_bean.as_ref()
    }

    /// Returns the value that failed.
    #[must_use]
    pub const fn invalid_value(&self) -> &Value {
        &self.invalid_value
    }

    /// Returns the path from the root to the invalid value.
    #[must_use]
    pub const fn property_path(&self) -> &PropertyPath {
        &self.property_path
    }

    /// Returns the failing constraint.
    #[must_use]
    pub const fn descriptor(&self) -> &Arc<ConstraintDescriptor> {
        &self.descriptor
    }

    /// Returns the kind of element the constraint was declared on.
    #[must_use]
    pub const fn element_kind(&self) -> ElementKind {
        self.element_kind
    }
}

impl PartialEq for ConstraintViolation {
    fn eq(&self, other: &Self) -> bool {
        self.root_bean == other.root_bean
            && self.property_path == other.property_path
            && self.message == other.message
            && self.message_template == other.message_template
            && self.invalid_value == other.invalid_value
    }
}

/// Set of violations in discovery order.
///
/// Structurally equal violations are kept once. Equality of two sets
/// ignores order.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    violations: Vec<ConstraintViolation>,
}

impl Violations {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Adds a violation unless an equal one is present; returns whether it was added.
    pub fn insert(&mut self, violation: ConstraintViolation) -> bool {
        if self.violations.contains(&violation) {
            return false;
        }
        self.violations.push(violation);
        true
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when validation passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterates over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, ConstraintViolation> {
        self.violations.iter()
    }

    /// Returns the rendered property paths.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|violation| violation.property_path().to_string())
            .collect()
    }

    /// Returns the violations reported at the rendered `path`.
    pub fn at_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ConstraintViolation> {
        self.violations
            .iter()
            .filter(move |violation| violation.property_path().to_string() == path)
    }

    /// Consumes the set, returning the violations.
    #[must_use]
    pub fn into_vec(self) -> Vec<ConstraintViolation> {
        self.violations
    }
}

impl PartialEq for Violations {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .violations
                .iter()
                .all(|violation| other.violations.contains(violation))
    }
}

impl IntoIterator for Violations {
    type Item = ConstraintViolation;
    type IntoIter = std::vec::IntoIter<ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a ConstraintViolation;
    type IntoIter = std::slice::Iter<'a, ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
