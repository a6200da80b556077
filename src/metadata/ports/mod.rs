//! Port definitions for constraint metadata.

pub mod definitions;
pub mod feed;

pub use definitions::ConstraintDefinitionSource;
pub use feed::DeclarationFeed;
