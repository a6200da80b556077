//! Adapter implementations for value extraction.

pub mod builtin;

pub use builtin::{
    ArrayElementExtractor, IterableElementExtractor, ListElementExtractor, MapKeyExtractor,
    MapValueExtractor, OptionalValueExtractor, builtin_declarations,
};
