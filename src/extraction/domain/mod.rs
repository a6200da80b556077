//! Domain types for value extraction.

pub mod descriptor;
pub mod extracted;

pub use descriptor::{ExtractorDeclaration, ExtractorTypeArgument, ValueExtractorDescriptor};
pub use extracted::{ExtractedValue, ValueCollector};
