// lib.rs — Exposes the dependency engine and its hosts.
//
// The main binary entry point remains in main.rs. Integration tests and
// benches link against this library.

pub mod backend;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod document;
pub mod indentation;
pub mod project;
pub mod reserved_words;
pub mod utf16;
// test_utils is available in test builds and when the `test-support` feature is enabled.
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
