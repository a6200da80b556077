//! Builds constraint descriptors from constraint annotations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::metadata::{
    domain::{
        AttributeKind, CheckingUnitId, ComposingConstraint, ConstraintAnnotation,
        ConstraintDefinition, ConstraintDescriptor, DescriptorParts, ElementKind,
        GROUPS_ATTRIBUTE, MESSAGE_ATTRIBUTE, PAYLOAD_ATTRIBUTE,
    },
    error::{DefinitionError, DefinitionResult},
    ports::ConstraintDefinitionSource,
};
use crate::model::TypeName;

/// Groups and payload handed down from a composed constraint to its children.
struct Inherited<'a> {
    groups: &'a BTreeSet<TypeName>,
    payload: &'a BTreeSet<TypeName>,
}

/// Resolves constraint annotations into descriptors.
///
/// The authoring contract of each definition is checked once, and the
/// checking units of each constraint type are resolved once and cached.
pub struct ConstraintDescriptorFactory {
    source: Arc<dyn ConstraintDefinitionSource>,
    checked: DashMap<TypeName, ()>,
    checking_units: DashMap<TypeName, Vec<CheckingUnitId>>,
    next_id: AtomicU64,
}

impl ConstraintDescriptorFactory {
    /// Creates a factory reading definitions from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ConstraintDefinitionSource>) -> Self {
        Self {
            source,
            checked: DashMap::new(),
            checking_units: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds the descriptor of one constraint occurrence.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the constraint type is unknown,
    /// its definition is malformed, its composition is cyclic or the
    /// annotation's attribute values do not fit the definition.
    pub fn build(
        &self,
        annotation: &ConstraintAnnotation,
        element_kind: ElementKind,
    ) -> DefinitionResult<Arc<ConstraintDescriptor>> {
        let mut stack = Vec::new();
        self.build_node(annotation, element_kind, None, &mut stack)
            .map(Arc::new)
    }

    /// Returns the checking units cached so far for `constraint_type`.
    #[must_use]
    pub fn cached_checking_units(&self, constraint_type: &TypeName) -> Option<Vec<CheckingUnitId>> {
        self.checking_units
            .get(constraint_type)
            .map(|units| units.value().clone())
    }

    fn build_node(
        &self,
        annotation: &ConstraintAnnotation,
        element_kind: ElementKind,
        inherited: Option<Inherited<'_>>,
        stack: &mut Vec<TypeName>,
    ) -> DefinitionResult<ConstraintDescriptor> {
        let constraint_type = &annotation.constraint_type;
        let definition = self
            .source
            .definition(constraint_type)
            .ok_or_else(|| DefinitionError::UnknownConstraint(constraint_type.clone()))?;
        if stack.contains(constraint_type) {
            return Err(DefinitionError::CyclicComposition(constraint_type.clone()));
        }
        self.check_definition(&definition)?;

        let mut attributes = resolve_attributes(&definition, annotation)?;
        let (groups, payload) = match inherited {
            Some(parent) => (parent.groups.clone(), parent.payload.clone()),
            None => {
                let mut groups = type_names(attributes.get(GROUPS_ATTRIBUTE));
                if groups.is_empty() {
                    groups.insert(TypeName::default_group());
                }
                (groups, type_names(attributes.get(PAYLOAD_ATTRIBUTE)))
            }
        };
        attributes.insert(GROUPS_ATTRIBUTE.to_owned(), type_list(&groups));
        attributes.insert(PAYLOAD_ATTRIBUTE.to_owned(), type_list(&payload));
        let message_template = attributes
            .get(MESSAGE_ATTRIBUTE)
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_owned();

        let checking_units = self.checking_units_for(&definition);

        stack.push(constraint_type.clone());
        let mut composing = Vec::new();
        for (child, position) in composing_annotations(&definition) {
            let overridden = self.apply_overrides(&definition, &attributes, child, position)?;
            let descriptor = self.build_node(
                &overridden,
                element_kind,
                Some(Inherited {
                    groups: &groups,
                    payload: &payload,
                }),
                stack,
            )?;
            composing.push(Arc::new(descriptor));
        }
        stack.pop();

        if checking_units.is_empty() && composing.is_empty() {
            return Err(DefinitionError::MissingCheckingUnit(constraint_type.clone()));
        }

        Ok(ConstraintDescriptor::from_parts(DescriptorParts {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            constraint_type: constraint_type.clone(),
            attributes,
            message_template,
            groups,
            payload,
            checking_units,
            composing,
            report_as_single_violation: definition.report_as_single_violation,
            composition: definition.composition,
            element_kind,
        }))
    }

    fn check_definition(&self, definition: &ConstraintDefinition) -> DefinitionResult<()> {
        let constraint_type = &definition.constraint_type;
        if self.checked.contains_key(constraint_type) {
            return Ok(());
        }
        let message = definition
            .attribute(MESSAGE_ATTRIBUTE)
            .ok_or_else(|| DefinitionError::malformed(constraint_type, "missing message attribute"))?;
        if message.kind != AttributeKind::Text {
            return Err(DefinitionError::malformed(
                constraint_type,
                "message attribute must be text",
            ));
        }
        for name in [GROUPS_ATTRIBUTE, PAYLOAD_ATTRIBUTE] {
            let attribute = definition.attribute(name).ok_or_else(|| {
                DefinitionError::malformed(constraint_type, format!("missing {name} attribute"))
            })?;
            let empty_default = attribute
                .default
                .as_ref()
                .and_then(JsonValue::as_array)
                .is_some_and(Vec::is_empty);
            if attribute.kind != AttributeKind::TypeList || !empty_default {
                return Err(DefinitionError::malformed(
                    constraint_type,
                    format!("{name} attribute must be a list of types defaulting to []"),
                ));
            }
        }
        for attribute in &definition.attributes {
            if let Some(default) = &attribute.default
                && !attribute.kind.accepts(default)
            {
                return Err(DefinitionError::malformed(
                    constraint_type,
                    format!("default of {} must be {}", attribute.name, attribute.kind),
                ));
            }
        }
        self.checked.insert(constraint_type.clone(), ());
        Ok(())
    }

    fn checking_units_for(&self, definition: &ConstraintDefinition) -> Vec<CheckingUnitId> {
        let constraint_type = &definition.constraint_type;
        if let Some(cached) = self.checking_units.get(constraint_type) {
            return cached.value().clone();
        }
        let units = self
            .source
            .builtin_checking_units(constraint_type)
            .unwrap_or_else(|| definition.validated_by.clone());
        debug!(constraint = %constraint_type, units = units.len(), "resolved checking units");
        self.checking_units
            .entry(constraint_type.clone())
            .or_insert(units)
            .value()
            .clone()
    }

    fn apply_overrides(
        &self,
        definition: &ConstraintDefinition,
        attributes: &BTreeMap<String, JsonValue>,
        child: &ConstraintAnnotation,
        position: Option<usize>,
    ) -> DefinitionResult<ConstraintAnnotation> {
        let mut overridden = child.clone();
        for attribute in &definition.attributes {
            for target in &attribute.overrides {
                let applies = target.constraint == child.constraint_type
                    && target.index.is_none_or(|index| Some(index) == position);
                if !applies {
                    continue;
                }
                let Some(child_definition) = self.source.definition(&child.constraint_type) else {
                    return Err(DefinitionError::UnknownConstraint(child.constraint_type.clone()));
                };
                let Some(target_attribute) = child_definition.attribute(&target.attribute) else {
                    return Err(DefinitionError::UnknownOverrideTarget {
                        constraint: definition.constraint_type.clone(),
                        attribute: attribute.name.clone(),
                        target: target.constraint.clone(),
                        target_attribute: target.attribute.clone(),
                    });
                };
                if target_attribute.kind != attribute.kind {
                    return Err(DefinitionError::OverrideTypeMismatch {
                        constraint: definition.constraint_type.clone(),
                        attribute: attribute.name.clone(),
                        target: target.constraint.clone(),
                        target_attribute: target.attribute.clone(),
                    });
                }
                if let Some(value) = attributes.get(&attribute.name) {
                    overridden
                        .attributes
                        .insert(target.attribute.clone(), value.clone());
                }
            }
        }
        Ok(overridden)
    }
}

impl std::fmt::Debug for ConstraintDescriptorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintDescriptorFactory")
            .field("checked", &self.checked.len())
            .field("checking_units", &self.checking_units.len())
            .finish_non_exhaustive()
    }
}

/// Composing annotations in declaration order; list members carry their
/// 1-based position.
fn composing_annotations(
    definition: &ConstraintDefinition,
) -> Vec<(&ConstraintAnnotation, Option<usize>)> {
    definition
        .composing
        .iter()
        .flat_map(|composing| match composing {
            ComposingConstraint::Single(annotation) => vec![(annotation, None)],
            ComposingConstraint::List(annotations) => annotations
                .iter()
                .enumerate()
                .map(|(index, annotation)| (annotation, Some(index + 1)))
                .collect(),
        })
        .collect()
}

fn resolve_attributes(
    definition: &ConstraintDefinition,
    annotation: &ConstraintAnnotation,
) -> DefinitionResult<BTreeMap<String, JsonValue>> {
    let constraint_type = &definition.constraint_type;
    for (name, value) in &annotation.attributes {
        let attribute =
            definition
                .attribute(name)
                .ok_or_else(|| DefinitionError::UnknownAttribute {
                    constraint: constraint_type.clone(),
                    attribute: name.clone(),
                })?;
        if !attribute.kind.accepts(value) {
            return Err(DefinitionError::InvalidAttributeValue {
                constraint: constraint_type.clone(),
                attribute: name.clone(),
                expected: attribute.kind,
            });
        }
    }
    definition
        .attributes
        .iter()
        .map(|attribute| {
            let value = annotation
                .attributes
                .get(&attribute.name)
                .or(attribute.default.as_ref())
                .cloned()
                .ok_or_else(|| DefinitionError::MissingAttributeValue {
                    constraint: constraint_type.clone(),
                    attribute: attribute.name.clone(),
                })?;
            Ok((attribute.name.clone(), value))
        })
        .collect()
}

fn type_names(value: Option<&JsonValue>) -> BTreeSet<TypeName> {
    value
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(TypeName::new)
                .collect()
        })
        .unwrap_or_default()
}

fn type_list(types: &BTreeSet<TypeName>) -> JsonValue {
    types
        .iter()
        .map(|name| JsonValue::String(name.as_str().to_owned()))
        .collect()
}
