//! Port definitions for value extraction.

pub mod extractor;

pub use extractor::{ValueExtractor, ValueReceiver};
