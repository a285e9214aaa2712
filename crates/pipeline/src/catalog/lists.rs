//! List functions and processors

use crate::{
	errors::BuildError,
	function::{function_tree, Function, FunctionNode, Operator},
	lift::{lift_function, FunctionArg},
	operators,
	processor::Processor,
};

/// An operator that collects `n` inputs into a list
pub fn to_list(n: usize) -> Function {
	Function::new(FunctionNode::Operator(Operator::ToList(n)))
}

/// The length of a list, map or string
pub fn size(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::size(), [a.into()])
}

/// `a`, sorted
pub fn sort(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::sort(), [a.into()])
}

/// An operator that sorts a list by the value of `key` on each element.
/// `key` must take at most one input.
pub fn sort_on(key: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	let key = lift_function(key);
	if key.input_arity() > 1 || key.output_arity() != 1 {
		return Err(BuildError::arity("SortOn key", 1, key.input_arity()));
	}
	return Ok(Function::new(FunctionNode::Operator(Operator::SortOn(key))));
}

/// A processor that emits every element of each list it receives
pub fn unpack() -> Processor {
	Processor::unpack()
}

/// A processor that packs events into lists, see [`Processor::pack`]
pub fn pack() -> Processor {
	Processor::pack()
}
