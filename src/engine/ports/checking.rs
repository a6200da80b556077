//! Checking unit port: the pluggable predicate behind a constraint.

use crate::metadata::{CheckingUnitId, ConstraintDescriptor};
use crate::model::{TypeName, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A checking unit rejected the attributes of its constraint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct InitializationError {
    reason: String,
}

impl InitializationError {
    /// Creates an initialisation error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Pass/fail logic of one constraint for one family of value types.
///
/// A fresh instance is created and initialised once per constraint
/// descriptor; `is_valid` may then be called concurrently.
pub trait ConstraintValidator: Send + Sync + fmt::Debug {
    /// Reads the constraint's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError`] when the attributes are unusable.
    fn initialize(&mut self, _descriptor: &ConstraintDescriptor) -> Result<(), InitializationError> {
        Ok(())
    }

    /// Returns `true` when `value` satisfies the constraint.
    fn is_valid(&self, value: &Value, context: &mut CheckContext) -> bool;
}

/// Per-check context handed to [`ConstraintValidator::is_valid`].
///
/// A failing check reports the constraint's own message template unless
/// the default violation is disabled; additional violations with custom
/// templates may be added.
#[derive(Debug)]
pub struct CheckContext {
    default_template: String,
    default_disabled: bool,
    custom_templates: Vec<String>,
}

impl CheckContext {
    /// Creates a context for a constraint with the given message template.
    #[must_use]
    pub fn new(default_template: impl Into<String>) -> Self {
        Self {
            default_template: default_template.into(),
            default_disabled: false,
            custom_templates: Vec::new(),
        }
    }

    /// Returns the constraint's message template.
    #[must_use]
    pub fn default_message_template(&self) -> &str {
        &self.default_template
    }

    /// Suppresses the violation carrying the default template.
    pub const fn disable_default_violation(&mut self) {
        self.default_disabled = true;
    }

    /// Adds a violation with a custom message template.
    pub fn add_violation(&mut self, template: impl Into<String>) {
        self.custom_templates.push(template.into());
    }

    /// Returns the templates of the violations a failed check reports.
    ///
    /// The default template is kept when it was disabled but nothing
    /// replaced it.
    #[must_use]
    pub fn into_templates(self) -> Vec<String> {
        if self.default_disabled && !self.custom_templates.is_empty() {
            return self.custom_templates;
        }
        let mut templates = vec![self.default_template];
        templates.extend(self.custom_templates);
        templates
    }
}

type ValidatorFactoryFn = dyn Fn() -> Box<dyn ConstraintValidator> + Send + Sync;

/// A registered checking unit: an identifier, the value type it supports
/// and a factory for fresh validators.
#[derive(Clone)]
pub struct CheckingUnit {
    id: CheckingUnitId,
    supported_type: TypeName,
    factory: Arc<ValidatorFactoryFn>,
}

impl CheckingUnit {
    /// Creates a unit from a validator factory.
    #[must_use]
    pub fn new<F>(id: impl Into<CheckingUnitId>, supported_type: impl Into<TypeName>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ConstraintValidator> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            supported_type: supported_type.into(),
            factory: Arc::new(factory),
        }
    }

    /// Creates a unit whose validators start from [`Default`].
    #[must_use]
    pub fn of<V>(id: impl Into<CheckingUnitId>, supported_type: impl Into<TypeName>) -> Self
    where
        V: ConstraintValidator + Default + 'static,
    {
        Self::new(id, supported_type, || Box::new(V::default()))
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &CheckingUnitId {
        &self.id
    }

    /// Returns the most general value type the unit accepts.
    #[must_use]
    pub const fn supported_type(&self) -> &TypeName {
        &self.supported_type
    }

    /// Creates an uninitialised validator.
    #[must_use]
    pub fn create(&self) -> Box<dyn ConstraintValidator> {
        (self.factory)()
    }
}

impl fmt::Debug for CheckingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckingUnit")
            .field("id", &self.id)
            .field("supported_type", &self.supported_type)
            .finish_non_exhaustive()
    }
}
