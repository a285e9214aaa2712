//! Map functions and processors.
//!
//! Maps are keyed by text; other keys are stored by their text form.

use crate::{
	errors::BuildError,
	function::{function_tree, Function},
	lift::FunctionArg,
	operators,
	processor::Processor,
	tuples,
};

/// An operator that reads the value under `key`.
/// Missing keys produce `None`.
pub fn get(key: &str) -> Function {
	tuples::fetch_attribute(key)
}

/// The values of map `a`, in key order
pub fn values(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::values(), [a.into()])
}

/// A processor that puts (key, value) pairs into a map
/// and emits the map after every pair
pub fn put_into() -> Processor {
	Processor::map_put_into()
}
