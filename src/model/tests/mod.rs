//! Unit tests for the model module.

mod value_tests;
