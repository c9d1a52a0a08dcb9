//! Gene representation and mutation engine for search-based test generation.
//!
//! Genes model the mutable input data of a generated test case. Strings are
//! mutated blindly, seeded with taint markers, specialized once the system
//! under test reveals how it uses them, and narrowed by archive feedback.
//! SQL foreign keys are bound to primary keys inserted before them.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use engines::genes::{Gene, Individual};
pub use engines::search::SearchServices;
pub use error::{GeneError, Result};
