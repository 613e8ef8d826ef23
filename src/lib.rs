//! sqlgate - SQL over HTTP for SQLite
//!
//! Accepts SQL text with positional arguments as JSON, runs it against a
//! SQLite database and answers with a uniform JSON envelope:
//! - Statement classification by leading keyword (read / write / rejected)
//! - Prepared execution with positional binding
//! - Typed row decoding into JSON-safe values

pub mod config;
pub mod gateway;
pub mod server;
