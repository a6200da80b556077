//! Source of constraint definitions.

use crate::metadata::domain::{CheckingUnitId, ConstraintDefinition};
use crate::model::TypeName;
use std::sync::Arc;

/// Resolves constraint types to their definitions.
pub trait ConstraintDefinitionSource: Send + Sync {
    /// Returns the definition of a constraint type.
    fn definition(&self, constraint_type: &TypeName) -> Option<Arc<ConstraintDefinition>>;

    /// Returns the built-in checking units of a constraint type, or `None`
    /// when the type is not built in and its own `validated_by` applies.
    fn builtin_checking_units(&self, constraint_type: &TypeName) -> Option<Vec<CheckingUnitId>>;
}
