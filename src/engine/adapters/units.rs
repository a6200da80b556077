//! Checking units of the built-in constraints.
//!
//! Every unit except `not-null`, `not-empty.*` and `not-blank` treats a
//! null value as valid.

use crate::engine::ports::{CheckContext, CheckingUnit, ConstraintValidator, InitializationError};
use crate::metadata::{ConstraintDescriptor, adapters::units};
use crate::model::{ContainerContent, Value, well_known};
use mockable::Clock;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::Arc;

/// Clock shared by the temporal checking units.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

fn integer_attribute(
    descriptor: &ConstraintDescriptor,
    name: &str,
) -> Result<i64, InitializationError> {
    descriptor
        .attribute(name)
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| {
            InitializationError::new(format!(
                "{} requires an integer {name}",
                descriptor.constraint_type()
            ))
        })
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::Text(text) => Some(text.chars().count()),
        Value::Container(container) => Some(match container.content() {
            ContainerContent::Sequence(elements) => elements.len(),
            ContainerContent::Entries(entries) => entries.len(),
            ContainerContent::Single(held) => usize::from(held.is_some()),
        }),
        _ => None,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "bounds beyond 2^53 compare with double precision"
)]
fn compare_number(value: &Value, bound: i64) -> Option<Ordering> {
    match value {
        Value::Int(number) => Some(number.cmp(&bound)),
        Value::Float(number) => number.partial_cmp(&(bound as f64)),
        _ => None,
    }
}

/// `NotNull`: the value is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotNullValidator;

impl ConstraintValidator for NotNullValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        !value.is_null()
    }
}

/// `Null`: the value is absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullValidator;

impl ConstraintValidator for NullValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        value.is_null()
    }
}

/// `NotEmpty`: text or container with at least one element.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotEmptyValidator;

impl ConstraintValidator for NotEmptyValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        length(value).is_some_and(|count| count > 0)
    }
}

/// `NotBlank`: text with at least one non-whitespace character.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotBlankValidator;

impl ConstraintValidator for NotBlankValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        match value {
            Value::Text(text) => text.chars().any(|character| !character.is_whitespace()),
            _ => false,
        }
    }
}

/// `Size`: the length lies within `min..=max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeValidator {
    min: i64,
    max: i64,
}

impl ConstraintValidator for SizeValidator {
    fn initialize(&mut self, descriptor: &ConstraintDescriptor) -> Result<(), InitializationError> {
        self.min = integer_attribute(descriptor, "min")?;
        self.max = integer_attribute(descriptor, "max")?;
        if self.min < 0 {
            return Err(InitializationError::new("the min parameter cannot be negative"));
        }
        if self.max < self.min {
            return Err(InitializationError::new(
                "the max parameter cannot be lower than min",
            ));
        }
        Ok(())
    }

    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        if value.is_null() {
            return true;
        }
        length(value)
            .and_then(|count| i64::try_from(count).ok())
            .is_some_and(|count| (self.min..=self.max).contains(&count))
    }
}

/// `Min`: the number is at least `value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinValidator {
    bound: i64,
}

impl ConstraintValidator for MinValidator {
    fn initialize(&mut self, descriptor: &ConstraintDescriptor) -> Result<(), InitializationError> {
        self.bound = integer_attribute(descriptor, "value")?;
        Ok(())
    }

    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        value.is_null() || compare_number(value, self.bound).is_some_and(Ordering::is_ge)
    }
}

/// `Max`: the number is at most `value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxValidator {
    bound: i64,
}

impl ConstraintValidator for MaxValidator {
    fn initialize(&mut self, descriptor: &ConstraintDescriptor) -> Result<(), InitializationError> {
        self.bound = integer_attribute(descriptor, "value")?;
        Ok(())
    }

    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        value.is_null() || compare_number(value, self.bound).is_some_and(Ordering::is_le)
    }
}

/// `Positive`: the number is strictly greater than zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositiveValidator;

impl ConstraintValidator for PositiveValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        value.is_null() || compare_number(value, 0).is_some_and(Ordering::is_gt)
    }
}

/// `Negative`: the number is strictly lower than zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct NegativeValidator;

impl ConstraintValidator for NegativeValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        value.is_null() || compare_number(value, 0).is_some_and(Ordering::is_lt)
    }
}

/// `Pattern`: the whole text matches `regexp`.
#[derive(Debug, Default, Clone)]
pub struct PatternValidator {
    pattern: Option<Regex>,
}

impl ConstraintValidator for PatternValidator {
    fn initialize(&mut self, descriptor: &ConstraintDescriptor) -> Result<(), InitializationError> {
        let regexp = descriptor
            .attribute("regexp")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| InitializationError::new("Pattern requires a textual regexp"))?;
        let anchored = Regex::new(&format!("^(?:{regexp})$"))
            .map_err(|error| InitializationError::new(error.to_string()))?;
        self.pattern = Some(anchored);
        Ok(())
    }

    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        match value {
            Value::Null => true,
            Value::Text(text) => self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(text)),
            _ => false,
        }
    }
}

/// `AssertTrue` and `AssertFalse`: the flag has the expected value.
#[derive(Debug, Clone, Copy)]
pub struct AssertValidator {
    expected: bool,
}

impl AssertValidator {
    /// Creates a validator expecting `expected`.
    #[must_use]
    pub const fn new(expected: bool) -> Self {
        Self { expected }
    }
}

impl ConstraintValidator for AssertValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        match value {
            Value::Null => true,
            Value::Bool(flag) => *flag == self.expected,
            _ => false,
        }
    }
}

/// `Past` and `Future`: the instant lies on the expected side of now.
#[derive(Clone)]
pub struct TemporalValidator {
    clock: SharedClock,
    expected: Ordering,
}

impl TemporalValidator {
    /// Creates a validator accepting instants before now.
    #[must_use]
    pub fn past(clock: SharedClock) -> Self {
        Self {
            clock,
            expected: Ordering::Less,
        }
    }

    /// Creates a validator accepting instants after now.
    #[must_use]
    pub fn future(clock: SharedClock) -> Self {
        Self {
            clock,
            expected: Ordering::Greater,
        }
    }
}

impl std::fmt::Debug for TemporalValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalValidator")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

impl ConstraintValidator for TemporalValidator {
    fn is_valid(&self, value: &Value, _context: &mut CheckContext) -> bool {
        match value {
            Value::Null => true,
            Value::Instant(instant) => instant.cmp(&self.clock.utc()) == self.expected,
            _ => false,
        }
    }
}

/// Returns the checking units of every built-in constraint.
#[must_use]
pub fn builtin_checking_units(clock: &SharedClock) -> Vec<CheckingUnit> {
    let past_clock = Arc::clone(clock);
    let future_clock = Arc::clone(clock);
    vec![
        CheckingUnit::of::<NotNullValidator>(units::NOT_NULL, well_known::OBJECT),
        CheckingUnit::of::<NullValidator>(units::NULL, well_known::OBJECT),
        CheckingUnit::of::<NotEmptyValidator>(
            units::NOT_EMPTY_CHAR_SEQUENCE,
            well_known::CHAR_SEQUENCE,
        ),
        CheckingUnit::of::<NotEmptyValidator>(units::NOT_EMPTY_COLLECTION, well_known::COLLECTION),
        CheckingUnit::of::<NotEmptyValidator>(units::NOT_EMPTY_MAP, well_known::MAP),
        CheckingUnit::of::<NotEmptyValidator>(units::NOT_EMPTY_ARRAY, well_known::ARRAY),
        CheckingUnit::of::<NotBlankValidator>(units::NOT_BLANK, well_known::CHAR_SEQUENCE),
        CheckingUnit::of::<SizeValidator>(units::SIZE_CHAR_SEQUENCE, well_known::CHAR_SEQUENCE),
        CheckingUnit::of::<SizeValidator>(units::SIZE_COLLECTION, well_known::COLLECTION),
        CheckingUnit::of::<SizeValidator>(units::SIZE_MAP, well_known::MAP),
        CheckingUnit::of::<SizeValidator>(units::SIZE_ARRAY, well_known::ARRAY),
        CheckingUnit::of::<MinValidator>(units::MIN_NUMBER, well_known::NUMBER),
        CheckingUnit::of::<MaxValidator>(units::MAX_NUMBER, well_known::NUMBER),
        CheckingUnit::of::<PositiveValidator>(units::POSITIVE_NUMBER, well_known::NUMBER),
        CheckingUnit::of::<NegativeValidator>(units::NEGATIVE_NUMBER, well_known::NUMBER),
        CheckingUnit::of::<PatternValidator>(units::PATTERN, well_known::CHAR_SEQUENCE),
        CheckingUnit::new(units::ASSERT_TRUE, well_known::BOOLEAN, || {
            Box::new(AssertValidator::new(true))
        }),
        CheckingUnit::new(units::ASSERT_FALSE, well_known::BOOLEAN, || {
            Box::new(AssertValidator::new(false))
        }),
        CheckingUnit::new(units::PAST_INSTANT, well_known::INSTANT, move || {
            Box::new(TemporalValidator::past(Arc::clone(&past_clock)))
        }),
        CheckingUnit::new(units::FUTURE_INSTANT, well_known::INSTANT, move || {
            Box::new(TemporalValidator::future(Arc::clone(&future_clock)))
        }),
    ]
}
