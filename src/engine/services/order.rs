//! Expansion of requested groups into a validation order.

use crate::metadata::{DefinitionError, DefinitionResult};
use crate::model::{TypeName, TypeSystem};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// A requested group sequence flattened into its groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSequence {
    name: TypeName,
    groups: Arc<[TypeName]>,
}

impl GroupSequence {
    /// Returns the sequence type.
    #[must_use]
    pub const fn name(&self) -> &TypeName {
        &self.name
    }

    /// Returns the groups in validation order.
    #[must_use]
    pub fn groups(&self) -> &[TypeName] {
        &self.groups
    }
}

/// Groups to validate for one call.
///
/// Plain groups are all validated; each sequence is validated group by
/// group, stopping after the first group that reports violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOrder {
    groups: Vec<TypeName>,
    sequences: Vec<GroupSequence>,
}

impl ValidationOrder {
    /// Creates an order validating exactly one group.
    #[must_use]
    pub fn single(group: TypeName) -> Self {
        Self {
            groups: vec![group],
            sequences: Vec::new(),
        }
    }

    /// Returns the plain groups.
    #[must_use]
    pub fn groups(&self) -> &[TypeName] {
        &self.groups
    }

    /// Returns the sequences.
    #[must_use]
    pub fn sequences(&self) -> &[GroupSequence] {
        &self.sequences
    }
}

/// Builds validation orders and caches flattened group sequences.
#[derive(Debug)]
pub struct ValidationOrderGenerator {
    type_system: Arc<TypeSystem>,
    sequences: DashMap<TypeName, Arc<[TypeName]>>,
}

impl ValidationOrderGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(type_system: Arc<TypeSystem>) -> Self {
        Self {
            type_system,
            sequences: DashMap::new(),
        }
    }

    /// Expands the requested groups; no group means `Default`.
    ///
    /// A plain group also brings in the groups it extends.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::CyclicGroupSequence`] or
    /// [`DefinitionError::UnexpandableGroupSequence`] for an invalid
    /// sequence.
    pub fn order_for(&self, requested: &[TypeName]) -> DefinitionResult<ValidationOrder> {
        let default = [TypeName::default_group()];
        let effective: &[TypeName] = if requested.is_empty() {
            &default
        } else {
            requested
        };
        let mut order = ValidationOrder {
            groups: Vec::new(),
            sequences: Vec::new(),
        };
        for group in effective {
            if self.type_system.group_sequence(group).is_some() {
                if order.sequences.iter().all(|sequence| &sequence.name != group) {
                    order.sequences.push(GroupSequence {
                        name: group.clone(),
                        groups: self.flattened(group)?,
                    });
                }
                continue;
            }
            for inherited in self.type_system.hierarchy(group) {
                if !order.groups.contains(&inherited) {
                    order.groups.push(inherited);
                }
            }
        }
        Ok(order)
    }

    /// Flattens the stages of a bean's redefined default group sequence.
    ///
    /// # Errors
    ///
    /// See [`ValidationOrderGenerator::order_for`].
    pub fn stages(&self, sequence: &[TypeName]) -> DefinitionResult<Vec<TypeName>> {
        let mut groups = Vec::new();
        for group in sequence {
            if self.type_system.group_sequence(group).is_some() {
                self.expand(group, &mut Vec::new(), &mut groups)?;
            } else {
                append(&mut groups, group, group)?;
            }
        }
        Ok(self.with_inherited(&groups))
    }

    fn flattened(&self, sequence: &TypeName) -> DefinitionResult<Arc<[TypeName]>> {
        if let Some(cached) = self.sequences.get(sequence) {
            return Ok(Arc::clone(cached.value()));
        }
        let mut groups = Vec::new();
        self.expand(sequence, &mut Vec::new(), &mut groups)?;
        let expanded = self.with_inherited(&groups);
        debug!(sequence = %sequence, groups = expanded.len(), "expanded group sequence");
        Ok(Arc::clone(
            self.sequences
                .entry(sequence.clone())
                .or_insert_with(|| expanded.into())
                .value(),
        ))
    }

    fn expand(
        &self,
        sequence: &TypeName,
        visiting: &mut Vec<TypeName>,
        groups: &mut Vec<TypeName>,
    ) -> DefinitionResult<()> {
        if visiting.contains(sequence) {
            return Err(DefinitionError::CyclicGroupSequence(sequence.clone()));
        }
        let Some(members) = self.type_system.group_sequence(sequence) else {
            return Ok(());
        };
        visiting.push(sequence.clone());
        for member in members {
            if self.type_system.group_sequence(member).is_some() {
                self.expand(member, visiting, groups)?;
            } else {
                append(groups, member, sequence)?;
            }
        }
        visiting.pop();
        Ok(())
    }

    /// Follows each group with the groups it extends.
    fn with_inherited(&self, groups: &[TypeName]) -> Vec<TypeName> {
        let mut expanded = Vec::new();
        for group in groups {
            for inherited in self.type_system.hierarchy(group) {
                if !expanded.contains(&inherited) {
                    expanded.push(inherited);
                }
            }
        }
        expanded
    }
}

/// Appends `group`; repeating the last group is a no-op, repeating an
/// earlier one makes `sequence` unexpandable.
fn append(groups: &mut Vec<TypeName>, group: &TypeName, sequence: &TypeName) -> DefinitionResult<()> {
    match groups.iter().position(|existing| existing == group) {
        None => groups.push(group.clone()),
        Some(position) if position + 1 == groups.len() => {}
        Some(_) => return Err(DefinitionError::UnexpandableGroupSequence(sequence.clone())),
    }
    Ok(())
}
