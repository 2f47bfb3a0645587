//! Shared naming and identifier utilities for the smelt source generator.
//!
//! This crate holds the small, dependency-free pieces every other smelt crate
//! needs: case conversion for generated member names, identifier-shape
//! validation, and the reserved-word table of the generated language.

pub mod casing;
pub mod ident;
pub mod keywords;

pub use casing::{to_camel_case, to_pascal_case};
pub use ident::{NameProblem, check_name};
pub use keywords::{escape_reserved, is_reserved_word};
