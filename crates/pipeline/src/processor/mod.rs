//! Stream transforms.
//!
//! A [`Processor`] is an immutable description of a stream transform with
//! fixed input and output arities. It holds no state: every call to
//! [`Processor::instantiate`] builds a fresh [`ProcessorInstance`], so one
//! processor may be used in many places (and many groups) at once.

use std::{fmt::Debug, sync::Arc};

use crate::{
	data::EventData,
	errors::BuildError,
	function::Function,
	group::{GroupInstance, GroupNode},
	lift::{lift_function, lift_processor, FunctionArg, ProcessorArg},
};

mod instance;
mod sink;
mod slice;

pub use instance::{Outbox, ProcessorInstance};
pub use sink::{Collector, SinkKind, SinkTarget};
pub use slice::SlicePolicy;

use instance::*;
use sink::SinkInstance;
use slice::SliceInstance;

/// Builds instances of a processor defined outside this crate
/// (file readers, tuple sources, and the like).
pub trait ProcessorFactory: Send + Sync + Debug {
	/// A short name for this processor, used in logs and errors
	fn name(&self) -> &str;

	fn input_arity(&self) -> usize;
	fn output_arity(&self) -> usize;

	/// Build a fresh instance of this processor.
	/// The instance must only emit on ports `[0, output_arity)`.
	fn build(&self) -> Box<dyn ProcessorInstance>;
}

#[derive(Debug)]
pub(crate) enum ProcessorKind {
	ApplyFunction {
		function: Function,
		input_arity: usize,
	},
	Cumulate(Function),
	Fork(usize),
	Slice {
		key: Function,
		inner: Processor,
		policy: SlicePolicy,
	},
	CountDecimate(usize),
	Trim(usize),
	KeepLast,
	TurnInto(EventData),
	Unpack,
	Pack,
	MapPutInto,
	SetPutInto,
	Source(Arc<Vec<EventData>>),
	Sink(SinkKind),
	Group(Arc<GroupNode>),
	External(Arc<dyn ProcessorFactory>),
}

/// A stream transform with fixed input and output arity
#[derive(Clone)]
pub struct Processor(Arc<ProcessorKind>);

impl Debug for Processor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl Processor {
	fn new(kind: ProcessorKind) -> Self {
		Self(Arc::new(kind))
	}

	/// Do `self` and `other` point to the same processor?
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// A short name for this processor's kind
	pub fn name(&self) -> &str {
		match &*self.0 {
			ProcessorKind::ApplyFunction { .. } => "ApplyFunction",
			ProcessorKind::Cumulate(_) => "Cumulate",
			ProcessorKind::Fork(_) => "Fork",
			ProcessorKind::Slice { .. } => "Slice",
			ProcessorKind::CountDecimate(_) => "CountDecimate",
			ProcessorKind::Trim(_) => "Trim",
			ProcessorKind::KeepLast => "KeepLast",
			ProcessorKind::TurnInto(_) => "TurnInto",
			ProcessorKind::Unpack => "Unpack",
			ProcessorKind::Pack => "Pack",
			ProcessorKind::MapPutInto => "MapPutInto",
			ProcessorKind::SetPutInto => "SetPutInto",
			ProcessorKind::Source(_) => "Source",
			ProcessorKind::Sink(SinkKind::Print { newline: false, .. }) => "Print",
			ProcessorKind::Sink(SinkKind::Print { newline: true, .. }) => "Println",
			ProcessorKind::Sink(SinkKind::Write { .. }) => "Write",
			ProcessorKind::Sink(SinkKind::Collect(_)) => "Collect",
			ProcessorKind::Group(_) => "Group",
			ProcessorKind::External(f) => f.name(),
		}
	}

	pub fn input_arity(&self) -> usize {
		match &*self.0 {
			ProcessorKind::ApplyFunction { input_arity, .. } => *input_arity,
			ProcessorKind::Source(_) => 0,
			ProcessorKind::Pack | ProcessorKind::MapPutInto => 2,
			ProcessorKind::Group(g) => g.input_arity(),
			ProcessorKind::External(f) => f.input_arity(),
			_ => 1,
		}
	}

	pub fn output_arity(&self) -> usize {
		match &*self.0 {
			ProcessorKind::ApplyFunction { function, .. } => function.output_arity(),
			ProcessorKind::Fork(n) => *n,
			ProcessorKind::Slice { inner, .. } => inner.output_arity(),
			ProcessorKind::Sink(_) => 0,
			ProcessorKind::Group(g) => g.output_arity(),
			ProcessorKind::External(f) => f.output_arity(),
			_ => 1,
		}
	}

	/// Build a fresh instance of this processor
	pub fn instantiate(&self) -> Box<dyn ProcessorInstance> {
		match &*self.0 {
			ProcessorKind::ApplyFunction {
				function,
				input_arity,
			} => Box::new(ApplyFunctionInstance::new(function.clone(), *input_arity)),
			ProcessorKind::Cumulate(f) => Box::new(CumulateInstance::new(f.clone())),
			ProcessorKind::Fork(n) => Box::new(ForkInstance { copies: *n }),
			ProcessorKind::Slice { key, inner, policy } => {
				Box::new(SliceInstance::new(key.clone(), inner.clone(), *policy))
			}
			ProcessorKind::CountDecimate(interval) => Box::new(CountDecimateInstance {
				interval: *interval,
				seen: 0,
			}),
			ProcessorKind::Trim(n) => Box::new(TrimInstance { remaining: *n }),
			ProcessorKind::KeepLast => Box::<KeepLastInstance>::default(),
			ProcessorKind::TurnInto(v) => Box::new(TurnIntoInstance { value: v.clone() }),
			ProcessorKind::Unpack => Box::new(UnpackInstance),
			ProcessorKind::Pack => Box::<PackInstance>::default(),
			ProcessorKind::MapPutInto => Box::<MapPutIntoInstance>::default(),
			ProcessorKind::SetPutInto => Box::<SetPutIntoInstance>::default(),
			ProcessorKind::Source(events) => Box::new(SourceInstance {
				events: events.clone(),
			}),
			ProcessorKind::Sink(kind) => Box::new(SinkInstance { kind: kind.clone() }),
			ProcessorKind::Group(g) => Box::new(GroupInstance::new(g.clone())),
			ProcessorKind::External(f) => f.build(),
		}
	}
}

//
// MARK: Factories
//

impl Processor {
	/// Evaluate `function` on every complete input tuple.
	///
	/// Input arity is the function's input arity; a function that takes
	/// no inputs is evaluated once per event on a single input port.
	pub fn apply_function(function: impl Into<FunctionArg>) -> Self {
		let function = lift_function(function);
		let input_arity = function.input_arity().max(1);
		Self::new(ProcessorKind::ApplyFunction {
			function,
			input_arity,
		})
	}

	/// Fold every event into a running state with a binary function,
	/// emitting the state after each event. The first event seeds the state.
	pub fn cumulate(function: impl Into<FunctionArg>) -> Result<Self, BuildError> {
		let function = lift_function(function);
		if function.input_arity() != 2 {
			return Err(BuildError::arity("Cumulate", 2, function.input_arity()));
		}
		if function.output_arity() != 1 {
			return Err(BuildError::arity("Cumulate output", 1, function.output_arity()));
		}
		Ok(Self::new(ProcessorKind::Cumulate(function)))
	}

	/// Copy every event to `copies` outputs
	pub fn fork(copies: usize) -> Result<Self, BuildError> {
		if copies == 0 {
			return Err(BuildError::arity("Fork", 1, 0));
		}
		Ok(Self::new(ProcessorKind::Fork(copies)))
	}

	/// Route each event to a copy of `inner` selected by `key(event)`,
	/// forwarding slice outputs as they arrive.
	pub fn slice(
		key: impl Into<FunctionArg>,
		inner: impl Into<ProcessorArg>,
	) -> Result<Self, BuildError> {
		Self::slice_with_policy(key, inner, SlicePolicy::default())
	}

	/// Like [`Processor::slice`], with an explicit merge policy.
	pub fn slice_with_policy(
		key: impl Into<FunctionArg>,
		inner: impl Into<ProcessorArg>,
		policy: SlicePolicy,
	) -> Result<Self, BuildError> {
		let key = lift_function(key);
		let inner = lift_processor(inner);

		if key.input_arity() > 1 || key.output_arity() != 1 {
			return Err(BuildError::arity("Slice key", 1, key.input_arity()));
		}

		if inner.input_arity() != 1 {
			return Err(BuildError::arity("Slice processor", 1, inner.input_arity()));
		}

		Ok(Self::new(ProcessorKind::Slice { key, inner, policy }))
	}

	/// Forward the first event, then every `interval`-th event after it
	pub fn count_decimate(interval: usize) -> Result<Self, BuildError> {
		if interval == 0 {
			return Err(BuildError::parameter("interval", "must be at least 1"));
		}
		Ok(Self::new(ProcessorKind::CountDecimate(interval)))
	}

	/// Drop the first `prefix` events
	pub fn trim(prefix: usize) -> Self {
		Self::new(ProcessorKind::Trim(prefix))
	}

	/// Emit the last event at end-of-stream
	pub fn keep_last() -> Self {
		Self::new(ProcessorKind::KeepLast)
	}

	/// Replace every event with `value`
	pub fn turn_into(value: impl Into<EventData>) -> Self {
		Self::new(ProcessorKind::TurnInto(value.into()))
	}

	/// Emit each element of list events; pass everything else through.
	pub fn unpack() -> Self {
		Self::new(ProcessorKind::Unpack)
	}

	/// Pack the events of input 0 into lists.
	/// Input 1 carries booleans: `true` emits the events packed so far
	/// before packing the current one.
	pub fn pack() -> Self {
		Self::new(ProcessorKind::Pack)
	}

	/// Put (key, value) pairs from inputs 0 and 1 into a map,
	/// emitting the whole map after every pair.
	/// Keys that are not text are stored as their text form.
	pub fn map_put_into() -> Self {
		Self::new(ProcessorKind::MapPutInto)
	}

	/// Emit the set of every distinct event seen so far
	pub fn set_put_into() -> Self {
		Self::new(ProcessorKind::SetPutInto)
	}

	/// Emit `events` when the pipeline starts
	pub fn source(events: impl IntoIterator<Item = EventData>) -> Self {
		Self::new(ProcessorKind::Source(Arc::new(events.into_iter().collect())))
	}

	/// Write every event to stdout
	pub fn print() -> Self {
		Self::print_to(SinkTarget::stdout(), false)
	}

	/// Write every event to stdout, followed by a newline
	pub fn println() -> Self {
		Self::print_to(SinkTarget::stdout(), true)
	}

	pub fn print_to(target: SinkTarget, newline: bool) -> Self {
		Self::new(ProcessorKind::Sink(SinkKind::Print { target, newline }))
	}

	/// Write the raw bytes of every event to `target`.
	/// Events must be text or lists of bytes.
	pub fn write_to(target: SinkTarget) -> Self {
		Self::new(ProcessorKind::Sink(SinkKind::Write { target }))
	}

	/// Write raw bytes to stdout
	pub fn stdout() -> Self {
		Self::write_to(SinkTarget::stdout())
	}

	/// Write raw bytes to stderr
	pub fn stderr() -> Self {
		Self::write_to(SinkTarget::stderr())
	}

	/// A sink that stores every event in the returned [`Collector`]
	pub fn collect() -> (Self, Collector) {
		let c = Collector::new();
		(Self::collect_into(c.clone()), c)
	}

	/// A sink that stores every event in `collector`
	pub fn collect_into(collector: Collector) -> Self {
		Self::new(ProcessorKind::Sink(SinkKind::Collect(collector)))
	}

	/// Wrap a processor defined outside this crate
	pub fn external(factory: impl ProcessorFactory + 'static) -> Self {
		Self::new(ProcessorKind::External(Arc::new(factory)))
	}

	pub(crate) fn group(node: GroupNode) -> Self {
		Self::new(ProcessorKind::Group(Arc::new(node)))
	}
}
