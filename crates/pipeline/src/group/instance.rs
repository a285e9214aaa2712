use std::{collections::VecDeque, sync::Arc};
use tracing::trace;

use super::{GroupNode, Route};
use crate::{
	data::EventData,
	errors::RunError,
	processor::{Outbox, ProcessorInstance},
	NodeIdx,
};

/// A running group.
///
/// Events move between members through a FIFO queue,
/// which is drained after every call.
pub(crate) struct GroupInstance {
	node: Arc<GroupNode>,

	/// One instance per member, indexed by node
	members: Vec<Box<dyn ProcessorInstance>>,

	/// Events waiting to be pushed into a member
	queue: VecDeque<(NodeIdx, usize, EventData)>,
}

impl GroupInstance {
	pub fn new(node: Arc<GroupNode>) -> Self {
		let members = node
			.graph
			.iter_nodes_idx()
			.map(|(_, m)| m.processor.instantiate())
			.collect();

		Self {
			node,
			members,
			queue: VecDeque::new(),
		}
	}

	/// Send a member's output events where they need to go
	fn route(&mut self, from: NodeIdx, events: Vec<(usize, EventData)>, out: &mut Outbox) {
		let routes = &self.node.routes[from.as_usize()];
		for (port, data) in events {
			match routes.get(port).copied().flatten() {
				Some(Route::Node(to, to_port)) => self.queue.push_back((to, to_port, data)),
				Some(Route::Boundary(k)) => out.send(k, data),
				None => trace!(message = "Dropping event from unbound port", node = %from, port),
			}
		}
	}

	/// Push queued events until none remain
	fn drain(&mut self, out: &mut Outbox) -> Result<(), RunError> {
		while let Some((node, port, data)) = self.queue.pop_front() {
			let mut buf = Outbox::new();
			self.members[node.as_usize()].push(port, data, &mut buf)?;
			self.route(node, buf.take(), out);
		}
		Ok(())
	}
}

impl ProcessorInstance for GroupInstance {
	fn start(&mut self, out: &mut Outbox) -> Result<(), RunError> {
		// Every member is started before any of them receives an event
		let node = self.node.clone();
		for idx in node.graph.topological_order() {
			let mut buf = Outbox::new();
			self.members[idx.as_usize()].start(&mut buf)?;
			self.route(*idx, buf.take(), out);
		}
		self.drain(out)
	}

	fn push(&mut self, port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		let (node, node_port) = *self.node.inputs.get(port).ok_or(RunError::BadPort {
			port,
			arity: self.node.input_arity,
		})?;

		self.queue.push_back((node, node_port, data));
		self.drain(out)
	}

	fn finish(&mut self, out: &mut Outbox) -> Result<(), RunError> {
		let node = self.node.clone();
		for idx in node.graph.topological_order() {
			let mut buf = Outbox::new();
			self.members[idx.as_usize()].finish(&mut buf)?;
			self.route(*idx, buf.take(), out);
			self.drain(out)?;
		}
		Ok(())
	}
}
