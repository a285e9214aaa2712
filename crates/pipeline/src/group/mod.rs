//! Groups: processor graphs behind a processor-shaped boundary

use brook_util::graph::{finalized::FinalizedGraph, graph::Graph};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::{
	errors::{BuildError, PortRef},
	labels::NodeLabel,
	lift::{lift_processor, ProcessorArg},
	processor::Processor,
	NodeIdx,
};

mod instance;
pub(crate) use instance::GroupInstance;

/// The input port of a single-input processor
pub const INPUT: usize = 0;
/// The output port of a single-output processor
pub const OUTPUT: usize = 0;
/// The first port of a two-port processor
pub const TOP: usize = 0;
/// The second port of a two-port processor
pub const BOTTOM: usize = 1;
/// Same as [`TOP`]
pub const LEFT: usize = 0;
/// Same as [`BOTTOM`]
pub const RIGHT: usize = 1;

#[derive(Debug)]
pub(crate) struct GroupMember {
	pub label: Option<NodeLabel>,
	pub processor: Processor,
}

impl GroupMember {
	fn describe(&self, idx: NodeIdx) -> String {
		match &self.label {
			Some(l) => format!("`{l}` ({idx})"),
			None => format!("{} ({idx})", self.processor.name()),
		}
	}
}

#[derive(Debug)]
pub(crate) struct GroupEdge {
	pub from_port: usize,
	pub to_port: usize,
}

/// Where an internal output port sends its events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
	/// To an input port of another member
	Node(NodeIdx, usize),

	/// Out of the group, on this boundary output
	Boundary(usize),
}

/// A sealed group, ready to be instantiated
#[derive(Debug)]
pub(crate) struct GroupNode {
	input_arity: usize,
	output_arity: usize,
	graph: FinalizedGraph<GroupMember, GroupEdge>,

	/// Boundary input `k` feeds `inputs[k]`
	inputs: Vec<(NodeIdx, usize)>,

	/// `routes[node][port]` is the destination of that node's output port.
	/// Unbound outputs are `None`, and their events are dropped.
	routes: Vec<Vec<Option<Route>>>,
}

impl GroupNode {
	pub fn input_arity(&self) -> usize {
		self.input_arity
	}

	pub fn output_arity(&self) -> usize {
		self.output_arity
	}
}

/// Assembles a graph of processors into a single [`Processor`].
///
/// ```ignore
/// let mut g = Group::new(1, 1);
/// let a = g.add(Processor::trim(1));
/// let b = g.add(Processor::keep_last());
/// g.connect_simple(a, b)?;
/// g.associate_input(0, a, INPUT)?;
/// g.associate_output(0, b, OUTPUT)?;
/// let p = g.seal()?;
/// ```
///
/// Every call checks the graph it is about to produce, and fails
/// as soon as something is wrong. A sealed group is a [`Processor`] like
/// any other, and may be added to other groups.
#[derive(Debug)]
pub struct Group {
	input_arity: usize,
	output_arity: usize,
	graph: Graph<GroupMember, GroupEdge>,

	inputs: Vec<Option<(NodeIdx, usize)>>,
	outputs: Vec<Option<(NodeIdx, usize)>>,

	/// Internal input ports that already receive events
	bound_inputs: HashSet<(NodeIdx, usize)>,

	/// Internal output ports that already send events somewhere
	bound_outputs: HashSet<(NodeIdx, usize)>,
}

impl Group {
	/// Make an empty group with the given boundary
	pub fn new(input_arity: usize, output_arity: usize) -> Self {
		Self {
			input_arity,
			output_arity,
			graph: Graph::new(),
			inputs: vec![None; input_arity],
			outputs: vec![None; output_arity],
			bound_inputs: HashSet::new(),
			bound_outputs: HashSet::new(),
		}
	}

	pub fn input_arity(&self) -> usize {
		self.input_arity
	}

	pub fn output_arity(&self) -> usize {
		self.output_arity
	}

	/// Add a processor to this group
	pub fn add(&mut self, processor: impl Into<ProcessorArg>) -> NodeIdx {
		self.graph.add_node(GroupMember {
			label: None,
			processor: lift_processor(processor),
		})
	}

	/// Add a processor with a label, used in logs
	pub fn add_named(
		&mut self,
		label: impl Into<NodeLabel>,
		processor: impl Into<ProcessorArg>,
	) -> NodeIdx {
		self.graph.add_node(GroupMember {
			label: Some(label.into()),
			processor: lift_processor(processor),
		})
	}

	/// Get the processor at `node`
	pub fn get(&self, node: NodeIdx) -> Option<&Processor> {
		self.graph.get_node(node).map(|m| &m.processor)
	}

	fn processor(&self, node: NodeIdx) -> Result<&Processor, BuildError> {
		self.get(node).ok_or(BuildError::NoSuchNode { node })
	}

	fn check_input(&self, node: NodeIdx, port: usize) -> Result<(), BuildError> {
		let arity = self.processor(node)?.input_arity();
		let port = PortRef::node_input(node, port);
		if port.port >= arity {
			return Err(BuildError::PortOutOfRange { port, arity });
		}
		if self.bound_inputs.contains(&(node, port.port)) {
			return Err(BuildError::PortAlreadyBound { port });
		}
		Ok(())
	}

	fn check_output(&self, node: NodeIdx, port: usize) -> Result<(), BuildError> {
		let arity = self.processor(node)?.output_arity();
		let port = PortRef::node_output(node, port);
		if port.port >= arity {
			return Err(BuildError::PortOutOfRange { port, arity });
		}
		if self.bound_outputs.contains(&(node, port.port)) {
			return Err(BuildError::PortAlreadyBound { port });
		}
		Ok(())
	}

	/// Send the events of `from`'s output `from_port` to `to`'s input `to_port`.
	///
	/// Every input and output port may be connected at most once.
	/// Use a fork to send one output to many places.
	pub fn connect(
		&mut self,
		from: NodeIdx,
		from_port: usize,
		to: NodeIdx,
		to_port: usize,
	) -> Result<(), BuildError> {
		self.check_output(from, from_port)?;
		self.check_input(to, to_port)?;

		if from == to || self.graph.has_path(to, from) {
			return Err(BuildError::CycleDetected { from, to });
		}

		self.graph.add_edge(
			from,
			to,
			GroupEdge {
				from_port,
				to_port,
			},
		);
		self.bound_outputs.insert((from, from_port));
		self.bound_inputs.insert((to, to_port));
		Ok(())
	}

	/// Connect `from`'s only output to `to`'s only input
	pub fn connect_simple(&mut self, from: NodeIdx, to: NodeIdx) -> Result<(), BuildError> {
		let outputs = self.processor(from)?.output_arity();
		if outputs != 1 {
			return Err(BuildError::arity("connect_simple source output", 1, outputs));
		}

		let inputs = self.processor(to)?.input_arity();
		if inputs != 1 {
			return Err(BuildError::arity("connect_simple destination input", 1, inputs));
		}

		self.connect(from, OUTPUT, to, INPUT)
	}

	/// Connect each node to the next with [`Group::connect_simple`]
	pub fn chain(&mut self, nodes: &[NodeIdx]) -> Result<(), BuildError> {
		for w in nodes.windows(2) {
			self.connect_simple(w[0], w[1])?;
		}
		Ok(())
	}

	/// Feed this group's input `input` to `node`'s input `port`
	pub fn associate_input(
		&mut self,
		input: usize,
		node: NodeIdx,
		port: usize,
	) -> Result<(), BuildError> {
		let boundary = PortRef::boundary_input(input);
		match self.inputs.get(input) {
			None => {
				return Err(BuildError::PortOutOfRange {
					port: boundary,
					arity: self.input_arity,
				})
			}
			Some(Some(_)) => return Err(BuildError::PortAlreadyBound { port: boundary }),
			Some(None) => {}
		}

		self.check_input(node, port)?;
		self.inputs[input] = Some((node, port));
		self.bound_inputs.insert((node, port));
		Ok(())
	}

	/// Send `node`'s output `port` to this group's output `output`
	pub fn associate_output(
		&mut self,
		output: usize,
		node: NodeIdx,
		port: usize,
	) -> Result<(), BuildError> {
		let boundary = PortRef::boundary_output(output);
		match self.outputs.get(output) {
			None => {
				return Err(BuildError::PortOutOfRange {
					port: boundary,
					arity: self.output_arity,
				})
			}
			Some(Some(_)) => return Err(BuildError::PortAlreadyBound { port: boundary }),
			Some(None) => {}
		}

		self.check_output(node, port)?;
		self.outputs[output] = Some((node, port));
		self.bound_outputs.insert((node, port));
		Ok(())
	}

	/// Freeze this group into a [`Processor`].
	///
	/// Every boundary port must be mapped to an internal port.
	pub fn seal(self) -> Result<Processor, BuildError> {
		let inputs = self
			.inputs
			.iter()
			.enumerate()
			.map(|(k, x)| {
				x.ok_or(BuildError::UnboundBoundaryPort {
					port: PortRef::boundary_input(k),
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		for (k, x) in self.outputs.iter().enumerate() {
			if x.is_none() {
				return Err(BuildError::UnboundBoundaryPort {
					port: PortRef::boundary_output(k),
				});
			}
		}

		for (idx, member) in self.graph.iter_nodes_idx() {
			for port in 0..member.processor.input_arity() {
				if !self.bound_inputs.contains(&(idx, port)) {
					warn!(
						message = "Input port is not connected, it will never receive events",
						node = %member.describe(idx),
						port
					);
				}
			}
		}

		let graph = self.graph.finalize().ok_or(BuildError::HasCycle)?;

		let mut routes = graph
			.iter_nodes_idx()
			.map(|(_, m)| vec![None; m.processor.output_arity()])
			.collect::<Vec<_>>();

		for (from, _) in graph.iter_nodes_idx() {
			for edge_idx in graph.edges_starting_at(from) {
				if let Some((_, to, edge)) = graph.get_edge(*edge_idx) {
					routes[from.as_usize()][edge.from_port] = Some(Route::Node(to, edge.to_port));
				}
			}
		}

		for (k, x) in self.outputs.iter().enumerate() {
			if let Some((node, port)) = x {
				routes[node.as_usize()][*port] = Some(Route::Boundary(k));
			}
		}

		debug!(
			message = "Sealed group",
			inputs = self.input_arity,
			outputs = self.output_arity,
			nodes = graph.len_nodes(),
			edges = graph.len_edges(),
		);

		Ok(Processor::group(GroupNode {
			input_arity: self.input_arity,
			output_arity: self.output_arity,
			graph,
			inputs,
			routes,
		}))
	}

	/// Build a group that runs `processors` one after another.
	///
	/// The group has the first processor's inputs and the last processor's outputs.
	/// Every other connection must be single-port.
	pub fn linear(processors: &[Processor]) -> Result<Processor, BuildError> {
		let (first, last) = match (processors.first(), processors.last()) {
			(Some(f), Some(l)) => (f, l),
			_ => return Err(BuildError::arity("linear group", 1, 0)),
		};

		let mut g = Group::new(first.input_arity(), last.output_arity());
		let nodes = processors.iter().map(|p| g.add(p)).collect::<Vec<_>>();
		g.chain(&nodes)?;

		let (head, tail) = (nodes[0], nodes[nodes.len() - 1]);
		for k in 0..first.input_arity() {
			g.associate_input(k, head, k)?;
		}
		for k in 0..last.output_arity() {
			g.associate_output(k, tail, k)?;
		}

		g.seal()
	}
}
