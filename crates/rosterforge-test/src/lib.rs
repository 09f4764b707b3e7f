//! Shared test fixtures for RosterForge crates.
//!
//! This crate provides problem builders and pure checking functions for tests.
//! It does NOT depend on the encoding or solver crates to avoid circular
//! dev-dependencies.
//!
//! - [`fixtures`] - small problems, permissive policy defaults, assignment pinning
//! - [`random`] - seeded random problems for property tests
//! - [`checks`] - run-length and contiguity checks over hour patterns
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rosterforge-test = { workspace = true }
//! ```

pub mod checks;
pub mod fixtures;
pub mod random;

pub use checks::{bits_of, is_single_block, run_lengths};
pub use fixtures::{demo_defaults, demo_week, open_defaults, pin, single_day, week};
pub use random::random_problem;
