//! Shared test utilities used across robustclust crates.
//!
//! - [`tracing`] captures spans and events so suites can assert on the
//!   structured diagnostics emitted by query selection.
//! - [`profile`] reads environment overrides for property-test case counts.

pub mod profile;
pub mod tracing;
