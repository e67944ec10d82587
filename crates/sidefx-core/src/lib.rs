#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the sidefx crates.
//!
//! - `Interner`/`Symbol`: deduplicated identifiers (names of variables,
//!   functions, classes, modules)
//! - `Colors`: ANSI palette for CLI dumps

mod colors;
mod interner;

#[cfg(test)]
mod interner_tests;

pub use colors::Colors;
pub use interner::{Interner, Symbol};
