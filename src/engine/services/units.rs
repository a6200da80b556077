//! Registry of checking units and per-value unit selection.

use crate::engine::{
    adapters::{SharedClock, builtin_checking_units},
    error::{ValidationError, ValidationResult},
    ports::CheckingUnit,
};
use crate::metadata::{CheckingUnitId, ConstraintDescriptor};
use crate::model::{TypeName, TypeSystem, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Checking units by identifier.
///
/// A constraint lists candidate units; the unit used for a value is the
/// most specific candidate whose supported type accepts the value's
/// runtime type. Null values are matched against the declared type of the
/// constrained element and fall back to the first candidate.
#[derive(Debug, Clone)]
pub struct CheckingUnitRegistry {
    type_system: Arc<TypeSystem>,
    units: HashMap<CheckingUnitId, CheckingUnit>,
}

impl CheckingUnitRegistry {
    /// Creates a registry holding the built-in units.
    #[must_use]
    pub fn new(type_system: Arc<TypeSystem>, clock: &SharedClock) -> Self {
        let mut registry = Self::empty(type_system);
        for unit in builtin_checking_units(clock) {
            registry.units.insert(unit.id().clone(), unit);
        }
        registry
    }

    /// Creates a registry without any unit.
    #[must_use]
    pub fn empty(type_system: Arc<TypeSystem>) -> Self {
        Self {
            type_system,
            units: HashMap::new(),
        }
    }

    /// Registers a unit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCheckingUnit`] when the
    /// identifier is taken.
    pub fn register(&mut self, unit: CheckingUnit) -> ValidationResult<()> {
        if self.units.contains_key(unit.id()) {
            return Err(ValidationError::DuplicateCheckingUnit(unit.id().clone()));
        }
        debug!(unit = %unit.id(), supported = %unit.supported_type(), "registered checking unit");
        self.units.insert(unit.id().clone(), unit);
        Ok(())
    }

    /// Looks up a unit.
    #[must_use]
    pub fn get(&self, id: &CheckingUnitId) -> Option<&CheckingUnit> {
        self.units.get(id)
    }

    /// Selects the unit checking `value` for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCheckingUnit`] for unregistered
    /// candidates, [`ValidationError::NoCheckingUnit`] when no candidate
    /// supports the value and [`ValidationError::AmbiguousCheckingUnit`]
    /// when several are equally specific.
    pub fn resolve(
        &self,
        descriptor: &ConstraintDescriptor,
        value: &Value,
        declared: &TypeName,
    ) -> ValidationResult<&CheckingUnit> {
        let candidates = descriptor
            .checking_units()
            .iter()
            .map(|id| {
                self.units
                    .get(id)
                    .ok_or_else(|| ValidationError::UnknownCheckingUnit(id.clone()))
            })
            .collect::<ValidationResult<Vec<_>>>()?;
        let runtime = value.runtime_type();
        let target = runtime.as_ref().unwrap_or(declared);
        let supporting = candidates
            .iter()
            .copied()
            .filter(|unit| self.type_system.is_assignable(unit.supported_type(), target))
            .collect::<Vec<&CheckingUnit>>();
        let maximal = supporting
            .iter()
            .copied()
            .filter(|unit| {
                !supporting.iter().any(|other| {
                    self.type_system
                        .is_proper_subtype(unit.supported_type(), other.supported_type())
                })
            })
            .collect::<Vec<&CheckingUnit>>();
        match maximal.as_slice() {
            [single] => Ok(*single),
            [] if runtime.is_none() => candidates.first().copied().ok_or_else(|| {
                ValidationError::NoCheckingUnit {
                    constraint: descriptor.constraint_type().clone(),
                    value_type: target.clone(),
                }
            }),
            [] => Err(ValidationError::NoCheckingUnit {
                constraint: descriptor.constraint_type().clone(),
                value_type: target.clone(),
            }),
            several => Err(ValidationError::AmbiguousCheckingUnit {
                constraint: descriptor.constraint_type().clone(),
                value_type: target.clone(),
                candidates: several.iter().map(|unit| unit.id().to_string()).collect(),
            }),
        }
    }
}
