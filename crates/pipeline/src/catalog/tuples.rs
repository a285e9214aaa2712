//! Named-field events.
//!
//! A tuple is an [`EventData::Map`](crate::data::EventData::Map).

use crate::function::{Function, FunctionNode, Operator};

/// An operator that reads field `name` of its input.
/// Missing fields produce `None`.
pub fn fetch_attribute(name: &str) -> Function {
	Function::new(FunctionNode::Operator(Operator::FetchAttribute(
		name.into(),
	)))
}

/// An operator that takes one input per name and builds a tuple
pub fn merge_scalars<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Function {
	Function::new(FunctionNode::Operator(Operator::MergeScalars(
		names.into_iter().map(|x| x.as_ref().into()).collect(),
	)))
}
