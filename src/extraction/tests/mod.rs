//! Unit tests for the extraction module.

mod builtin_tests;
mod registry_tests;
