//! Set functions and processors.
//!
//! A set is a list without duplicates. Membership uses
//! [`EventData::loose_eq`](crate::data::EventData::loose_eq), so `1` and `1.0` are the same element.

use crate::{
	errors::BuildError,
	function::{binary_tree, Function},
	lift::FunctionArg,
	operators,
	processor::Processor,
};

/// Is `x` an element of `set`?
pub fn is_element(
	x: impl Into<FunctionArg>,
	set: impl Into<FunctionArg>,
) -> Result<Function, BuildError> {
	binary_tree(operators::is_element(), x, set)
}

/// Is every element of `a` in `b`?
pub fn is_subset_or_equal(
	a: impl Into<FunctionArg>,
	b: impl Into<FunctionArg>,
) -> Result<Function, BuildError> {
	binary_tree(operators::is_subset_or_equal(), a, b)
}

/// A processor that emits the set of every distinct event seen so far,
/// sorted
pub fn put_into() -> Processor {
	Processor::set_put_into()
}
