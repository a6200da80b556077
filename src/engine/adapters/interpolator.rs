//! Template based message interpolation.

use crate::engine::ports::MessageInterpolator;
use crate::model::Value;
use minijinja::Environment;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::warn;

/// Name under which templates see the validated value.
pub const VALIDATED_VALUE: &str = "validated_value";

/// Renders message templates with `minijinja`.
///
/// Templates see every constraint attribute by name plus the validated
/// value as `validated_value`; e.g. `size must be between {{ min }} and
/// {{ max }}`. A template that fails to render is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vauban::engine::{MessageInterpolator, TemplateInterpolator};
/// use vauban::model::Value;
///
/// let attributes = BTreeMap::from([("min".to_owned(), serde_json::json!(2))]);
/// let message = TemplateInterpolator::new().interpolate(
///     "at least {{ min }}, got {{ validated_value }}",
///     &attributes,
///     &Value::Int(1),
/// );
/// assert_eq!(message, "at least 2, got 1");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateInterpolator;

impl TemplateInterpolator {
    /// Creates an interpolator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MessageInterpolator for TemplateInterpolator {
    fn interpolate(
        &self,
        template: &str,
        attributes: &BTreeMap<String, JsonValue>,
        validated_value: &Value,
    ) -> String {
        let mut context = attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<Map<String, JsonValue>>();
        context.insert(VALIDATED_VALUE.to_owned(), validated_value.to_json());
        Environment::new()
            .render_str(template, context)
            .unwrap_or_else(|error| {
                warn!(template, %error, "message template failed to render");
                template.to_owned()
            })
    }
}
