//! Extractor registration and resolution services.

pub mod registry;

pub use registry::ValueExtractorRegistry;
