//! Small directed graphs for pipeline definitions.
//!
//! These allow parallel edges and keep insertion order,
//! which petgraph's map-based graphs do not.

#[expect(clippy::module_inception)]
pub mod graph;

pub mod finalized;
pub mod util;
