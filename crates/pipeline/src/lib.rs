//! Composable event-stream pipelines.
//!
//! A pipeline is built from [`Function`]s (pure, stateless transforms of
//! a tuple of values) and [`Processor`]s (stateful stream transforms with
//! numbered input and output ports). Processors are wired together inside
//! a [`Group`], which seals into a processor of its own.
//!
//! [`Function`]: function::Function
//! [`Processor`]: processor::Processor
//! [`Group`]: group::Group

pub mod data;
pub mod errors;
pub mod function;
pub mod group;
pub mod labels;
pub mod lift;
pub mod operators;
pub mod processor;
pub mod runner;
pub mod spec;

mod catalog;
pub use catalog::*;

/// The index of a processor inside a [`group::Group`]
pub type NodeIdx = brook_util::graph::util::GraphNodeIdx;

/// Everything needed to build and run a pipeline by hand
pub mod prelude {
	pub use crate::{
		booleans,
		data::EventData,
		errors::{BuildError, FunctionError, RunError},
		function::{constant, function_tree, identity, stream_variable, x, y, z, Function},
		group::{Group, BOTTOM, INPUT, LEFT, OUTPUT, RIGHT, TOP},
		lift::{lift_function, lift_processor, FunctionArg, ProcessorArg},
		lists, maps, numbers, operators,
		processor::{Collector, Processor, SlicePolicy},
		runner::{run, run_single},
		sets, strings, tuples,
	};
}
