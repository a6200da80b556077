//! Execution of composed constraint trees.

use super::units::CheckingUnitRegistry;
use crate::engine::{
    error::{ValidationError, ValidationResult},
    ports::{CheckContext, CheckingUnit, ConstraintValidator},
};
use crate::metadata::{CheckingUnitId, CompositionType, ConstraintDescriptor};
use crate::model::{TypeName, Value};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A failed constraint awaiting interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingViolation {
    /// Constraint the violation is attributed to.
    pub descriptor: Arc<ConstraintDescriptor>,
    /// Message template to interpolate.
    pub message_template: String,
}

impl PendingViolation {
    fn of(descriptor: &Arc<ConstraintDescriptor>) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            message_template: descriptor.message_template().to_owned(),
        }
    }
}

/// Running outcome of a composite constraint.
struct Composition {
    all_passed: bool,
    any_passed: bool,
}

impl Composition {
    const fn record(&mut self, passed: bool) {
        if passed {
            self.any_passed = true;
        } else {
            self.all_passed = false;
        }
    }

    const fn passes(&self, composition: CompositionType) -> bool {
        match composition {
            CompositionType::And => self.all_passed,
            CompositionType::Or => self.any_passed,
            CompositionType::AllFalse => !self.any_passed,
        }
    }
}

/// Runs constraint trees against values.
///
/// Composing constraints run before their parent. Their failures become
/// the parent's violations unless the parent reports as a single
/// violation or composes with [`CompositionType::AllFalse`], in which
/// case one violation carrying the parent's template replaces them.
/// Initialised validators are cached per descriptor and unit.
pub struct ConstraintTreeExecutor {
    units: Arc<CheckingUnitRegistry>,
    validators: DashMap<(u64, CheckingUnitId), Arc<dyn ConstraintValidator>>,
}

impl ConstraintTreeExecutor {
    /// Creates an executor.
    #[must_use]
    pub fn new(units: Arc<CheckingUnitRegistry>) -> Self {
        Self {
            units,
            validators: DashMap::new(),
        }
    }

    /// Evaluates `descriptor` against `value`.
    ///
    /// `declared` is the declared type of the constrained element, used to
    /// select a checking unit for null values. With `fail_fast`, `And`
    /// compositions stop at the first failing child.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when no checking unit applies or a
    /// unit cannot be initialised.
    pub fn execute(
        &self,
        descriptor: &Arc<ConstraintDescriptor>,
        value: &Value,
        declared: &TypeName,
        fail_fast: bool,
    ) -> ValidationResult<Vec<PendingViolation>> {
        if descriptor.composing().is_empty() {
            return self.check(descriptor, value, declared);
        }

        let composition = descriptor.composition();
        let single = descriptor.report_as_single_violation();
        let mut outcome = Composition {
            all_passed: true,
            any_passed: false,
        };
        let mut violations = Vec::new();
        for child in descriptor.composing() {
            let failures = self.execute(child, value, declared, fail_fast)?;
            let passed = failures.is_empty();
            outcome.record(passed);
            violations.extend(failures);
            if passed && composition == CompositionType::Or {
                break;
            }
            if !passed && composition == CompositionType::And && (fail_fast || single) {
                break;
            }
        }

        let mut local = Vec::new();
        if !descriptor.checking_units().is_empty()
            && needs_local_check(composition, single, fail_fast, &violations)
        {
            local = self.check(descriptor, value, declared)?;
            outcome.record(local.is_empty());
        }

        if outcome.passes(composition) {
            return Ok(Vec::new());
        }
        if single || composition == CompositionType::AllFalse {
            violations.clear();
            if local.is_empty() {
                violations.push(PendingViolation::of(descriptor));
            }
        }
        violations.extend(local);
        Ok(violations)
    }

    fn check(
        &self,
        descriptor: &Arc<ConstraintDescriptor>,
        value: &Value,
        declared: &TypeName,
    ) -> ValidationResult<Vec<PendingViolation>> {
        let unit = self.units.resolve(descriptor, value, declared)?;
        let validator = self.validator(descriptor, unit)?;
        let mut context = CheckContext::new(descriptor.message_template());
        let valid = validator.is_valid(value, &mut context);
        trace!(
            constraint = %descriptor.constraint_type(),
            unit = %unit.id(),
            valid,
            "evaluated constraint"
        );
        if valid {
            return Ok(Vec::new());
        }
        Ok(context
            .into_templates()
            .into_iter()
            .map(|message_template| PendingViolation {
                descriptor: Arc::clone(descriptor),
                message_template,
            })
            .collect())
    }

    fn validator(
        &self,
        descriptor: &ConstraintDescriptor,
        unit: &CheckingUnit,
    ) -> ValidationResult<Arc<dyn ConstraintValidator>> {
        let key = (descriptor.id(), unit.id().clone());
        if let Some(cached) = self.validators.get(&key) {
            return Ok(Arc::clone(cached.value()));
        }
        let mut validator = unit.create();
        validator.initialize(descriptor).map_err(|error| {
            ValidationError::CheckingUnitInitialization {
                unit: unit.id().clone(),
                reason: error.to_string(),
            }
        })?;
        let initialised: Arc<dyn ConstraintValidator> = Arc::from(validator);
        Ok(Arc::clone(
            self.validators.entry(key).or_insert(initialised).value(),
        ))
    }
}

fn needs_local_check(
    composition: CompositionType,
    single: bool,
    fail_fast: bool,
    violations: &[PendingViolation],
) -> bool {
    if violations.is_empty() {
        return true;
    }
    !(fail_fast || (single && composition == CompositionType::And))
}

impl fmt::Debug for ConstraintTreeExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintTreeExecutor")
            .field("units", &self.units)
            .field("validators", &self.validators.len())
            .finish()
    }
}
