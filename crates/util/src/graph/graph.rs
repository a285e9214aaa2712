use petgraph::{
	algo::{has_path_connecting, toposort},
	graph::{DiGraph, NodeIndex},
};
use std::fmt::Debug;

use super::{
	finalized::FinalizedGraph,
	util::{GraphEdgeIdx, GraphNodeIdx},
};

/// A directed graph with parallel edges.
/// Fast writes are not a goal (within reason).
///
/// [`Graph`]s are designed to be created once,
/// (possibly mutated, if creation requires multiple stages),
/// and only read afterwards.
#[derive(Debug, Clone)]
pub struct Graph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// Array of nodes in this graph
	pub(super) nodes: Vec<NodeType>,

	/// Array of edges in this graph
	pub(super) edges: Vec<(GraphNodeIdx, GraphNodeIdx, EdgeType)>,
}

impl<NodeType, EdgeType> Graph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// Create an empty graph
	pub fn new() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
		}
	}

	/// Convert this graph to an immutable structure with fast reads.
	///
	/// Returns `None` if this graph has a cycle.
	pub fn finalize(self) -> Option<FinalizedGraph<NodeType, EdgeType>> {
		let topo_order = self.topological_order()?;

		let mut edge_map_out = (0..self.nodes.len())
			.map(|_| Vec::new())
			.collect::<Vec<_>>();
		for (i, x) in self.edges.iter().enumerate() {
			edge_map_out[usize::from(x.0)].push(GraphEdgeIdx(i));
		}

		Some(FinalizedGraph {
			graph: self,
			edge_map_out,
			topo_order,
		})
	}

	/// Add a node to this graph.
	#[inline]
	pub fn add_node(&mut self, node: NodeType) -> GraphNodeIdx {
		let i = self.nodes.len();
		self.nodes.push(node);
		GraphNodeIdx(i)
	}

	/// Get a node by index, if it exists
	#[inline]
	pub fn get_node(&self, node_idx: GraphNodeIdx) -> Option<&NodeType> {
		self.nodes.get(usize::from(node_idx))
	}

	/// The number of nodes in this graph
	#[inline]
	pub fn len_nodes(&self) -> usize {
		self.nodes.len()
	}

	/// Iterate over all nodes in this graph, including node index
	#[inline]
	pub fn iter_nodes_idx(&self) -> impl Iterator<Item = (GraphNodeIdx, &NodeType)> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(a, b)| (GraphNodeIdx(a), b))
	}

	/// Add an edge to this graph
	#[inline]
	pub fn add_edge(
		&mut self,
		from: GraphNodeIdx,
		to: GraphNodeIdx,
		edge_value: EdgeType,
	) -> GraphEdgeIdx {
		let i = self.edges.len();
		self.edges.push((from, to, edge_value));
		GraphEdgeIdx(i)
	}

	/// The number of edges in this graph
	#[inline]
	pub fn len_edges(&self) -> usize {
		self.edges.len()
	}

	/// Build a petgraph mirror of this graph's structure.
	/// Node indices are preserved.
	fn structure(&self) -> DiGraph<(), ()> {
		let mut g = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
		for _ in &self.nodes {
			g.add_node(());
		}
		for (from, to, _) in &self.edges {
			g.add_edge(NodeIndex::new(from.0), NodeIndex::new(to.0), ());
		}
		g
	}

	/// Returns `true` if there is a directed path from `from` to `to`.
	/// Every node reaches itself.
	pub fn has_path(&self, from: GraphNodeIdx, to: GraphNodeIdx) -> bool {
		has_path_connecting(
			&self.structure(),
			NodeIndex::new(from.0),
			NodeIndex::new(to.0),
			None,
		)
	}

	/// Every node in this graph, ordered so that each edge
	/// points from an earlier node to a later one.
	///
	/// Returns `None` if this graph has a cycle.
	pub fn topological_order(&self) -> Option<Vec<GraphNodeIdx>> {
		toposort(&self.structure(), None)
			.ok()
			.map(|x| x.into_iter().map(|n| GraphNodeIdx(n.index())).collect())
	}
}
