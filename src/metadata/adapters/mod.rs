//! Adapters supplying constraint declarations and definitions.

pub mod catalog;
pub mod json;
pub mod memory;

pub use catalog::{ConstraintCatalog, constraints, units};
pub use json::JsonMappingFeed;
pub use memory::InMemoryDeclarationFeed;
