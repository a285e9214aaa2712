//! Factories grouped by topic.
//!
//! These are plain modules; a factory may appear in more than one of them.

pub mod booleans;
pub mod lists;
pub mod maps;
pub mod numbers;
pub mod sets;
pub mod strings;
pub mod tuples;
