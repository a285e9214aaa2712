//! Pure functions over events.
//!
//! A [`Function`] is a cheap, shareable handle to an immutable node in an
//! expression tree. Cloning a [`Function`] never copies the tree, so the same
//! function may appear in many trees and processors at once.

use std::{fmt::Debug, sync::Arc};

use crate::{
	data::EventData,
	errors::{BuildError, FunctionError},
	lift::{lift_function, FunctionArg},
};

mod operator;
pub use operator::*;

/// The kinds of function node
#[derive(Debug)]
pub(crate) enum FunctionNode {
	/// Always returns the same value
	Constant(EventData),

	/// Returns its inputs unchanged
	Identity { arity: usize },

	/// Returns the input at `index`
	StreamVariable { index: usize },

	/// A named operator from the catalog
	Operator(Operator),

	/// `operator(children[0](x), children[1](x), ...)`
	Tree {
		operator: Function,
		children: Vec<Function>,
	},
}

/// A pure computation over a fixed number of inputs
#[derive(Clone)]
pub struct Function(pub(crate) Arc<FunctionNode>);

impl Debug for Function {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl Function {
	pub(crate) fn new(node: FunctionNode) -> Self {
		Self(Arc::new(node))
	}

	/// Do `self` and `other` point to the same function node?
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// The number of inputs this function expects
	pub fn input_arity(&self) -> usize {
		match &*self.0 {
			FunctionNode::Constant(_) => 0,
			FunctionNode::Identity { arity } => *arity,
			FunctionNode::StreamVariable { index } => index + 1,
			FunctionNode::Operator(op) => op.input_arity(),
			FunctionNode::Tree { operator, .. } => operator.input_arity(),
		}
	}

	/// The number of values this function produces
	pub fn output_arity(&self) -> usize {
		match &*self.0 {
			FunctionNode::Identity { arity } => *arity,
			FunctionNode::Tree { operator, .. } => operator.output_arity(),
			_ => 1,
		}
	}

	/// If this is a bare operator, return it.
	pub fn as_operator(&self) -> Option<&Operator> {
		match &*self.0 {
			FunctionNode::Operator(op) => Some(op),
			_ => None,
		}
	}

	/// If this is a constant, return its value.
	pub fn as_constant(&self) -> Option<&EventData> {
		match &*self.0 {
			FunctionNode::Constant(v) => Some(v),
			_ => None,
		}
	}

	/// Evaluate this function.
	///
	/// `inputs` must contain at least [`Function::input_arity`] values;
	/// extra values are ignored. The result always has exactly
	/// [`Function::output_arity`] values.
	pub fn evaluate(&self, inputs: &[EventData]) -> Result<Vec<EventData>, FunctionError> {
		let arity = self.input_arity();
		if inputs.len() < arity {
			return Err(FunctionError::NotEnoughInputs {
				expected: arity,
				got: inputs.len(),
			});
		}

		match &*self.0 {
			FunctionNode::Constant(v) => Ok(vec![v.clone()]),
			FunctionNode::Identity { arity } => Ok(inputs[..*arity].to_vec()),
			FunctionNode::StreamVariable { index } => Ok(vec![inputs[*index].clone()]),
			FunctionNode::Operator(op) => Ok(vec![op.apply(&inputs[..arity])?]),

			// Only the selected branch is evaluated
			FunctionNode::Tree { operator, children }
				if matches!(operator.as_operator(), Some(Operator::IfThenElse)) =>
			{
				let branch = match children[0].evaluate_single(inputs)? {
					EventData::Boolean(true) => &children[1],
					EventData::Boolean(false) => &children[2],
					x => {
						return Err(FunctionError::BadType {
							operator: Operator::IfThenElse.name(),
							got: x.type_name(),
						})
					}
				};
				Ok(vec![branch.evaluate_single(inputs)?])
			}

			FunctionNode::Tree { operator, children } => {
				let args = children
					.iter()
					.map(|c| c.evaluate_single(inputs))
					.collect::<Result<Vec<_>, _>>()?;
				operator.evaluate(&args)
			}
		}
	}

	/// Evaluate a function with exactly one output.
	pub(crate) fn evaluate_single(&self, inputs: &[EventData]) -> Result<EventData, FunctionError> {
		let mut out = self.evaluate(inputs)?;
		// Functions with one output always return a vec of length one.
		// Identity functions of other arities are rejected when trees are built.
		Ok(out.swap_remove(0))
	}
}

//
// MARK: Factories
//

/// A function that ignores its inputs and returns `value`.
pub fn constant(value: impl Into<EventData>) -> Function {
	Function::new(FunctionNode::Constant(value.into()))
}

/// The identity function of arity 1.
pub fn identity() -> Function {
	identity_n(1)
}

/// The identity function of arity `arity`.
/// Returns its `arity` inputs as an `arity`-tuple.
pub fn identity_n(arity: usize) -> Function {
	Function::new(FunctionNode::Identity { arity })
}

/// A function that returns its `index`-th input.
pub fn stream_variable(index: usize) -> Function {
	Function::new(FunctionNode::StreamVariable { index })
}

/// The first input
pub fn x() -> Function {
	stream_variable(0)
}

/// The second input
pub fn y() -> Function {
	stream_variable(1)
}

/// The third input
pub fn z() -> Function {
	stream_variable(2)
}

/// The if-then-else operator (condition, then, else).
pub fn if_then_else() -> Function {
	crate::operators::if_then_else()
}

/// Build a function tree.
///
/// Every child is evaluated against the tree's inputs, and their results
/// are passed to `operator`. The tree has the same input arity as `operator`,
/// so `children` must contain exactly that many functions, each of which
/// produces one value and needs no more inputs than the tree provides.
pub fn function_tree(
	operator: impl Into<FunctionArg>,
	children: impl IntoIterator<Item = FunctionArg>,
) -> Result<Function, BuildError> {
	let operator = lift_function(operator);
	let children = children.into_iter().map(lift_function).collect::<Vec<_>>();
	let arity = operator.input_arity();

	if children.len() != arity {
		return Err(BuildError::arity("FunctionTree", arity, children.len()));
	}

	for c in &children {
		if c.output_arity() != 1 {
			return Err(BuildError::arity(
				"FunctionTree child output",
				1,
				c.output_arity(),
			));
		}

		if c.input_arity() > arity {
			return Err(BuildError::arity(
				"FunctionTree child input",
				arity,
				c.input_arity(),
			));
		}
	}

	return Ok(Function::new(FunctionNode::Tree { operator, children }));
}

/// Shorthand for a binary function tree
pub(crate) fn binary_tree(
	operator: Function,
	a: impl Into<FunctionArg>,
	b: impl Into<FunctionArg>,
) -> Result<Function, BuildError> {
	function_tree(operator, [a.into(), b.into()])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operators;

	#[test]
	fn constant_ignores_input() {
		let c = constant(5);
		assert_eq!(c.input_arity(), 0);
		assert_eq!(c.evaluate(&[]).unwrap(), vec![EventData::Integer(5)]);
		assert_eq!(
			c.evaluate(&["a".into(), "b".into()]).unwrap(),
			vec![EventData::Integer(5)]
		);
	}

	#[test]
	fn identity_returns_tuple() {
		let i = identity_n(3);
		assert_eq!(i.input_arity(), 3);
		assert_eq!(i.output_arity(), 3);

		let input: Vec<EventData> = vec![1.into(), 2.into(), 3.into(), 4.into()];
		assert_eq!(i.evaluate(&input).unwrap(), input[..3].to_vec());
		assert!(matches!(
			i.evaluate(&input[..2]),
			Err(FunctionError::NotEnoughInputs {
				expected: 3,
				got: 2
			})
		));
	}

	#[test]
	fn tree_arity_follows_operator() {
		for op in [operators::plus(), operators::and(), operators::if_then_else()] {
			let n = op.input_arity();
			for k in 0..5 {
				if k == n {
					continue;
				}
				let children = (0..k)
					.map(|_| constant(1).into())
					.collect::<Vec<FunctionArg>>();
				assert!(matches!(
					function_tree(op.clone(), children),
					Err(BuildError::ArityMismatch { expected, got, .. }) if expected == n && got == k
				));
			}
		}
	}

	#[test]
	fn tree_evaluates_children() {
		// (x + y) - y
		let f = function_tree(
			operators::minus(),
			[
				binary_tree(operators::plus(), x(), y()).unwrap().into(),
				y().into(),
			],
		)
		.unwrap();
		assert_eq!(f.input_arity(), 2);
		assert_eq!(
			f.evaluate(&[10.into(), 3.into()]).unwrap(),
			vec![EventData::Integer(10)]
		);
	}

	#[test]
	fn tree_rejects_children_needing_more_inputs() {
		assert!(matches!(
			function_tree(operators::not(), [y().into()]),
			Err(BuildError::ArityMismatch { .. })
		));
		assert!(matches!(
			function_tree(operators::plus(), [identity_n(2).into(), x().into()]),
			Err(BuildError::ArityMismatch { .. })
		));
	}

	#[test]
	fn if_then_else_short_circuits() {
		// The else branch divides by zero, and is never evaluated when x is true.
		let bad = binary_tree(operators::divide(), 1, 0).unwrap();
		let f = function_tree(
			operators::if_then_else(),
			[x().into(), constant("yes").into(), bad.into()],
		)
		.unwrap();

		assert_eq!(
			f.evaluate(&[true.into(), 0.into(), 0.into()]).unwrap(),
			vec![EventData::from("yes")]
		);
		assert_eq!(
			f.evaluate(&[false.into(), 0.into(), 0.into()]),
			Err(FunctionError::DivisionByZero)
		);
		assert!(matches!(
			f.evaluate(&[1.into(), 0.into(), 0.into()]),
			Err(FunctionError::BadType { .. })
		));
	}

	#[test]
	fn shared_subtrees_are_not_copied() {
		let shared = binary_tree(operators::plus(), x(), y()).unwrap();
		let t = function_tree(operators::times(), [shared.clone().into(), shared.clone().into()])
			.unwrap();

		match &*t.0 {
			FunctionNode::Tree { children, .. } => {
				assert!(children[0].ptr_eq(&shared));
				assert!(children[1].ptr_eq(&shared));
			}
			_ => panic!("expected a tree"),
		}
	}
}
