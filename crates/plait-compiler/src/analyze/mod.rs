//! Semantic checks on parsed grammars.
//!
//! - `captures`: per type, every capture fits the field it targets
//! - `recursion`: per linked program, nullability and left recursion

mod captures;
pub mod recursion;

#[cfg(test)]
mod captures_tests;

pub use captures::check_captures;
