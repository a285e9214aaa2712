//! Errors we may encounter while building or running a pipeline

use crate::NodeIdx;
use smartstring::{LazyCompact, SmartString};
use std::{fmt::Display, sync::Arc};
use thiserror::Error;

/// Which side of a node a port is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
	/// A port that consumes events
	Input,

	/// A port that produces events
	Output,
}

impl Display for PortDirection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Input => write!(f, "input"),
			Self::Output => write!(f, "output"),
		}
	}
}

/// The thing a [`PortRef`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortOwner {
	/// The boundary of the group we're building
	Boundary,

	/// A node inside the group we're building
	Node(NodeIdx),
}

/// A specific input or output slot.
/// Only meaningful inside the group that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
	pub owner: PortOwner,
	pub port: usize,
	pub direction: PortDirection,
}

impl PortRef {
	pub fn node_input(node: NodeIdx, port: usize) -> Self {
		Self {
			owner: PortOwner::Node(node),
			port,
			direction: PortDirection::Input,
		}
	}

	pub fn node_output(node: NodeIdx, port: usize) -> Self {
		Self {
			owner: PortOwner::Node(node),
			port,
			direction: PortDirection::Output,
		}
	}

	pub fn boundary_input(port: usize) -> Self {
		Self {
			owner: PortOwner::Boundary,
			port,
			direction: PortDirection::Input,
		}
	}

	pub fn boundary_output(port: usize) -> Self {
		Self {
			owner: PortOwner::Boundary,
			port,
			direction: PortDirection::Output,
		}
	}
}

impl Display for PortRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.owner {
			PortOwner::Boundary => write!(f, "boundary {} {}", self.direction, self.port),
			PortOwner::Node(n) => write!(f, "node {n} {} {}", self.direction, self.port),
		}
	}
}

/// An error we encounter while composing functions and processors.
///
/// These always mean that a pipeline definition is malformed,
/// and are raised by the call that introduced the problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
	/// A function or processor got the wrong number of arguments
	#[error("{what} expects {expected} input(s), got {got}")]
	ArityMismatch {
		what: SmartString<LazyCompact>,
		expected: usize,
		got: usize,
	},

	/// A port index is outside `[0, arity)`
	#[error("{port} is out of range (arity is {arity})")]
	PortOutOfRange { port: PortRef, arity: usize },

	/// A port is already connected to something
	#[error("{port} is already bound")]
	PortAlreadyBound { port: PortRef },

	/// A group was sealed with a boundary port that isn't mapped to anything
	#[error("{port} is not mapped to an internal port")]
	UnboundBoundaryPort { port: PortRef },

	/// An edge would close a directed cycle
	#[error("connecting node {from} to node {to} would create a cycle")]
	CycleDetected { from: NodeIdx, to: NodeIdx },

	/// A group's graph contains a cycle
	#[error("group graph contains a cycle")]
	HasCycle,

	/// A node index does not belong to this group
	#[error("node {node} does not exist in this group")]
	NoSuchNode { node: NodeIdx },

	/// A factory received a parameter it cannot use
	#[error("bad parameter `{parameter}`: {message}")]
	InvalidParameter {
		parameter: SmartString<LazyCompact>,
		message: SmartString<LazyCompact>,
	},
}

impl BuildError {
	pub(crate) fn arity(what: &str, expected: usize, got: usize) -> Self {
		Self::ArityMismatch {
			what: what.into(),
			expected,
			got,
		}
	}

	pub(crate) fn parameter(parameter: &str, message: &str) -> Self {
		Self::InvalidParameter {
			parameter: parameter.into(),
			message: message.into(),
		}
	}
}

/// An error we encounter while evaluating a function
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
	/// We were given fewer inputs than this function's arity
	#[error("expected at least {expected} input(s), got {got}")]
	NotEnoughInputs { expected: usize, got: usize },

	/// An operator received an event it cannot handle
	#[error("`{operator}` cannot handle {got} input")]
	BadType {
		operator: &'static str,
		got: &'static str,
	},

	/// Numeric division by zero
	#[error("division by zero")]
	DivisionByZero,

	/// Integer arithmetic overflowed
	#[error("integer overflow in `{operator}`")]
	Overflow { operator: &'static str },
}

/// An error we encounter while running processors
#[derive(Debug, Clone, Error)]
pub enum RunError {
	/// A function inside a processor failed
	#[error("function error")]
	Function(#[from] FunctionError),

	/// An event was pushed on a port that doesn't exist
	#[error("no input port {port} (arity is {arity})")]
	BadPort { port: usize, arity: usize },

	/// We were given the wrong number of input streams
	#[error("expected {expected} input stream(s), got {got}")]
	WrongInputCount { expected: usize, got: usize },

	/// A sink could not write
	#[error("i/o error")]
	Io(#[from] Arc<std::io::Error>),

	/// An external processor failed
	#[error("processor `{processor}` failed: {message}")]
	Other {
		processor: SmartString<LazyCompact>,
		message: String,
	},
}

impl From<std::io::Error> for RunError {
	fn from(value: std::io::Error) -> Self {
		Self::Io(Arc::new(value))
	}
}
