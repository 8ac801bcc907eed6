//! BDD harness (cucumber-rs).
//!
//! Scenario tests live in `tests/cucumber.rs` and `features/`; this crate only exists to keep
//! them isolated from the production crates.
