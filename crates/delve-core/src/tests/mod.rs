//! Crate-level determinism and integration tests.
//!
//! # Test Structure
//!
//! - `determinism.rs`: same seed and inputs give identical logs and events
//! - `integration.rs`: bus, exploration and battle exercised together
//! - `helpers.rs`: roster factories and scripted runs

mod helpers;

pub use helpers::*;
