//! Crate-level scenario tests.
//!
//! # Test Structure
//!
//! - `determinism.rs`: Same seed and input produce the same game
//! - `integration.rs`: End-to-end tests of the tick pipeline
//! - `helpers.rs`: Scenario setup utilities and factory functions

mod helpers;
