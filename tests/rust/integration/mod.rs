//! Integration tests - drive the HTTP router against a real SQLite store
//!
//! Each test builds its own in-memory (or temp-file) database, so they can run in parallel.

mod common;
mod concurrency_tests;
