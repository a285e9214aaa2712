use std::fmt::Display;

/// The index of a node in a [`super::graph::Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphNodeIdx(pub(super) usize);

impl From<GraphNodeIdx> for usize {
	fn from(value: GraphNodeIdx) -> Self {
		value.0
	}
}

impl Display for GraphNodeIdx {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

impl GraphNodeIdx {
	/// Get this index as a `usize`
	pub fn as_usize(&self) -> usize {
		self.0
	}
}

/// The index of an edge in a [`super::graph::Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdgeIdx(pub(super) usize);

impl From<GraphEdgeIdx> for usize {
	fn from(value: GraphEdgeIdx) -> Self {
		value.0
	}
}

impl GraphEdgeIdx {
	/// Get this index as a `usize`
	pub fn as_usize(&self) -> usize {
		self.0
	}
}
