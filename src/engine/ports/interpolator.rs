//! Message interpolation port.

use crate::model::Value;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Renders the final message of a violation.
///
/// Called once per reported violation; never influences the outcome.
pub trait MessageInterpolator: Send + Sync + fmt::Debug {
    /// Renders `template` with the constraint's attributes and the
    /// validated value.
    fn interpolate(
        &self,
        template: &str,
        attributes: &BTreeMap<String, JsonValue>,
        validated_value: &Value,
    ) -> String;
}
