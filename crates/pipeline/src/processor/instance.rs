use smartstring::{LazyCompact, SmartString};
use std::collections::{BTreeMap, VecDeque};

use crate::{
	data::EventData,
	errors::{FunctionError, RunError},
	function::Function,
};

/// Events produced by a [`ProcessorInstance`].
/// Each entry is `(output port, event)`.
#[derive(Debug, Default)]
pub struct Outbox {
	events: Vec<(usize, EventData)>,
}

impl Outbox {
	pub fn new() -> Self {
		Self { events: Vec::new() }
	}

	/// Emit `data` on output port `port`
	pub fn send(&mut self, port: usize, data: EventData) {
		self.events.push((port, data));
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	/// Take every event in this outbox, in the order it was sent
	pub fn take(&mut self) -> Vec<(usize, EventData)> {
		std::mem::take(&mut self.events)
	}
}

/// A running processor.
///
/// Instances are built by [`Processor::instantiate`](super::Processor::instantiate),
/// and hold all of a processor's mutable state. Every method may emit events
/// into the given [`Outbox`].
pub trait ProcessorInstance: Send {
	/// Called once, before any event is pushed.
	fn start(&mut self, _out: &mut Outbox) -> Result<(), RunError> {
		Ok(())
	}

	/// Receive one event on input port `port`.
	fn push(&mut self, port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError>;

	/// Called once, after the last event.
	fn finish(&mut self, _out: &mut Outbox) -> Result<(), RunError> {
		Ok(())
	}
}

//
// MARK: Built-in instances
//

pub(super) struct ApplyFunctionInstance {
	function: Function,
	queues: Vec<VecDeque<EventData>>,
}

impl ApplyFunctionInstance {
	pub fn new(function: Function, input_arity: usize) -> Self {
		Self {
			function,
			queues: (0..input_arity).map(|_| VecDeque::new()).collect(),
		}
	}
}

impl ProcessorInstance for ApplyFunctionInstance {
	fn push(&mut self, port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		let arity = self.queues.len();
		self.queues
			.get_mut(port)
			.ok_or(RunError::BadPort { port, arity })?
			.push_back(data);

		while self.queues.iter().all(|q| !q.is_empty()) {
			let args = self
				.queues
				.iter_mut()
				.filter_map(|q| q.pop_front())
				.collect::<Vec<_>>();

			for (port, value) in self.function.evaluate(&args)?.into_iter().enumerate() {
				out.send(port, value);
			}
		}

		Ok(())
	}
}

pub(super) struct CumulateInstance {
	function: Function,
	state: Option<EventData>,
}

impl CumulateInstance {
	pub fn new(function: Function) -> Self {
		Self {
			function,
			state: None,
		}
	}
}

impl ProcessorInstance for CumulateInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		let next = match self.state.take() {
			None => data,
			Some(state) => self.function.evaluate_single(&[state, data])?,
		};
		out.send(0, next.clone());
		self.state = Some(next);
		Ok(())
	}
}

pub(super) struct ForkInstance {
	pub copies: usize,
}

impl ProcessorInstance for ForkInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		for i in 0..self.copies {
			out.send(i, data.clone());
		}
		Ok(())
	}
}

pub(super) struct CountDecimateInstance {
	pub interval: usize,
	pub seen: usize,
}

impl ProcessorInstance for CountDecimateInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		if self.seen % self.interval == 0 {
			out.send(0, data);
		}
		self.seen = self.seen.wrapping_add(1);
		Ok(())
	}
}

pub(super) struct TrimInstance {
	pub remaining: usize,
}

impl ProcessorInstance for TrimInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		if self.remaining == 0 {
			out.send(0, data);
		} else {
			self.remaining -= 1;
		}
		Ok(())
	}
}

#[derive(Default)]
pub(super) struct KeepLastInstance {
	last: Option<EventData>,
}

impl ProcessorInstance for KeepLastInstance {
	fn push(&mut self, _port: usize, data: EventData, _out: &mut Outbox) -> Result<(), RunError> {
		self.last = Some(data);
		Ok(())
	}

	fn finish(&mut self, out: &mut Outbox) -> Result<(), RunError> {
		if let Some(last) = self.last.take() {
			out.send(0, last);
		}
		Ok(())
	}
}

pub(super) struct TurnIntoInstance {
	pub value: EventData,
}

impl ProcessorInstance for TurnIntoInstance {
	fn push(&mut self, _port: usize, _data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		out.send(0, self.value.clone());
		Ok(())
	}
}

pub(super) struct UnpackInstance;

impl ProcessorInstance for UnpackInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		match data {
			EventData::List(items) => {
				for x in items.iter() {
					out.send(0, x.clone());
				}
			}
			x => out.send(0, x),
		}
		Ok(())
	}
}

pub(super) struct SourceInstance {
	pub events: std::sync::Arc<Vec<EventData>>,
}

impl ProcessorInstance for SourceInstance {
	fn start(&mut self, out: &mut Outbox) -> Result<(), RunError> {
		for x in self.events.iter() {
			out.send(0, x.clone());
		}
		Ok(())
	}

	fn push(&mut self, port: usize, _data: EventData, _out: &mut Outbox) -> Result<(), RunError> {
		Err(RunError::BadPort { port, arity: 0 })
	}
}

/// Matches the events of two input ports into pairs, in arrival order
#[derive(Default)]
struct Pairs {
	queues: [VecDeque<EventData>; 2],
}

impl Pairs {
	fn push(&mut self, port: usize, data: EventData) -> Result<(), RunError> {
		self.queues
			.get_mut(port)
			.ok_or(RunError::BadPort { port, arity: 2 })?
			.push_back(data);
		Ok(())
	}

	fn pop(&mut self) -> Option<(EventData, EventData)> {
		if self.queues.iter().any(VecDeque::is_empty) {
			return None;
		}
		let [a, b] = &mut self.queues;
		a.pop_front().zip(b.pop_front())
	}
}

/// Packs (data, flag) pairs into lists.
/// A `true` flag closes the current list before its event is added.
/// A list that is still open at end-of-stream is dropped.
#[derive(Default)]
pub(super) struct PackInstance {
	pairs: Pairs,
	pending: Vec<EventData>,
}

impl ProcessorInstance for PackInstance {
	fn push(&mut self, port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		self.pairs.push(port, data)?;

		while let Some((data, flag)) = self.pairs.pop() {
			match flag {
				EventData::Boolean(true) if !self.pending.is_empty() => {
					out.send(0, EventData::list(std::mem::take(&mut self.pending)))
				}
				EventData::Boolean(_) => {}
				x => {
					return Err(FunctionError::BadType {
						operator: "Pack",
						got: x.type_name(),
					}
					.into())
				}
			}
			self.pending.push(data);
		}
		Ok(())
	}
}

#[derive(Default)]
pub(super) struct MapPutIntoInstance {
	pairs: Pairs,
	map: BTreeMap<SmartString<LazyCompact>, EventData>,
}

impl ProcessorInstance for MapPutIntoInstance {
	fn push(&mut self, port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		self.pairs.push(port, data)?;

		while let Some((key, value)) = self.pairs.pop() {
			let key = match key {
				EventData::Text(t) => t,
				k => k.to_string().into(),
			};
			self.map.insert(key, value);
			out.send(0, EventData::map(self.map.clone()));
		}
		Ok(())
	}
}

/// Keeps every distinct event, sorted
#[derive(Default)]
pub(super) struct SetPutIntoInstance {
	items: Vec<EventData>,
}

impl ProcessorInstance for SetPutIntoInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		if !self.items.iter().any(|x| x.loose_eq(&data)) {
			self.items.push(data);
			self.items.sort_by(EventData::total_cmp);
		}
		out.send(0, EventData::list(self.items.clone()));
		Ok(())
	}
}
