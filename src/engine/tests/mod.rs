//! Unit tests for the validation engine.

mod validator_tests;
