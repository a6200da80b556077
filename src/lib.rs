//! Vauban: declarative object-graph validation.
//!
//! Constraints are declared per bean type, either in code or in a JSON
//! mapping, and checked against graphs of runtime values. Validation
//! follows cascaded references and container elements, honours groups and
//! group sequences, and reports every violation with the property path
//! that reaches it.
//!
//! # Architecture
//!
//! Vauban follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types describing declarations, metadata and violations
//! - **Ports**: Trait seams for declaration feeds, checking units, message
//!   interpolation and traversal vetoes
//! - **Adapters**: Built-in implementations of those ports
//!
//! # Modules
//!
//! - [`model`]: Type declarations, the type system and runtime values
//! - [`extraction`]: Value extractors for container elements
//! - [`metadata`]: Constraint definitions and aggregated bean metadata
//! - [`engine`]: Validators, group ordering and violation reporting

pub mod engine;
pub mod extraction;
pub mod metadata;
pub mod model;
