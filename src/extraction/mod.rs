//! Value extraction: locating validatable values inside containers.
//!
//! Extractors are registered per container type argument. When a value is
//! cascaded or a container element is constrained, the registry resolves
//! the maximally specific extractor for the runtime container type.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Built-in extractors in [`adapters`]
//! - Registry and resolution in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

pub use domain::{
    ExtractedValue, ExtractorDeclaration, ExtractorTypeArgument, ValueExtractorDescriptor,
};
pub use error::{ExtractionError, ExtractionResult};
pub use ports::{ValueExtractor, ValueReceiver};
pub use services::ValueExtractorRegistry;
