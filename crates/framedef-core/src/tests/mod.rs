//! Engine-level scenario and property tests.
//!
//! Unit tests live next to the code they test. The tests here drive whole
//! loads through [`Engine`](crate::Engine):
//! - **Integration tests**: documented load scenarios end to end
//! - **Property tests**: lookup and caching invariants over generated input
//! - **Helper functions**: batch builders and engine setup
//!
//! # Test Structure
//!
//! - `integration.rs`: scenario tests
//! - `properties.rs`: `proptest` properties
//! - `helpers.rs`: test setup utilities and section builders

mod helpers;
mod integration;

// Re-export for convenience
pub use helpers::*;
