//! Unit tests for the metadata module.

mod feed_tests;
