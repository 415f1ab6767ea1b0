//! Shared helpers for tests and benchmarks.

pub mod fixture_workspace;
