//! Unit tests - public API checks that need no running server

mod classification_tests;
mod envelope_tests;
