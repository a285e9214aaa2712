use std::fmt::Debug;

use super::{
	graph::Graph,
	util::{GraphEdgeIdx, GraphNodeIdx},
};

/// An immutable directed graph with parallel edges.
/// This is guaranteed to have no (directed) cycles.
///
/// All read operations are fast.
pub struct FinalizedGraph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// The graph data
	pub(super) graph: Graph<NodeType, EdgeType>,

	/// An array of edge idx, sorted by start node.
	/// Redundant, but makes reads faster.
	pub(super) edge_map_out: Vec<Vec<GraphEdgeIdx>>,

	/// Every node, in topological order
	pub(super) topo_order: Vec<GraphNodeIdx>,
}

impl<NodeType, EdgeType> Debug for FinalizedGraph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FinalizedGraph")
			.field("nodes", &self.graph.nodes)
			.field("edges", &self.graph.edges)
			.finish()
	}
}

impl<NodeType, EdgeType> FinalizedGraph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// The number of nodes in this graph
	#[inline]
	pub fn len_nodes(&self) -> usize {
		self.graph.len_nodes()
	}

	/// Iterate over all nodes in this graph, including node index
	#[inline]
	pub fn iter_nodes_idx(&self) -> impl Iterator<Item = (GraphNodeIdx, &NodeType)> {
		self.graph.iter_nodes_idx()
	}

	/// Get an edge by index, if it exists
	#[inline]
	pub fn get_edge(
		&self,
		edge_idx: GraphEdgeIdx,
	) -> Option<(GraphNodeIdx, GraphNodeIdx, &EdgeType)> {
		self.graph
			.edges
			.get(usize::from(edge_idx))
			.map(|(f, t, v)| (*f, *t, v))
	}

	/// The number of edges in this graph
	#[inline]
	pub fn len_edges(&self) -> usize {
		self.graph.len_edges()
	}

	/// Get all edges starting at the given node.
	/// Empty if the node does not exist.
	pub fn edges_starting_at(&self, node: GraphNodeIdx) -> &[GraphEdgeIdx] {
		self.edge_map_out
			.get(usize::from(node))
			.map(|x| x.as_slice())
			.unwrap_or_default()
	}

	/// Every node in this graph, in topological order
	pub fn topological_order(&self) -> &[GraphNodeIdx] {
		&self.topo_order
	}
}
