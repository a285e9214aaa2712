//! Boolean connectives and equality

use crate::{
	errors::BuildError,
	function::{binary_tree, function_tree, Function},
	lift::FunctionArg,
	operators,
};

pub use crate::function::if_then_else;

/// `a && b`
pub fn and(a: impl Into<FunctionArg>, b: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	binary_tree(operators::and(), a, b)
}

/// `a || b`
pub fn or(a: impl Into<FunctionArg>, b: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	binary_tree(operators::or(), a, b)
}

/// `a → b`
pub fn implies(
	a: impl Into<FunctionArg>,
	b: impl Into<FunctionArg>,
) -> Result<Function, BuildError> {
	binary_tree(operators::implies(), a, b)
}

/// `!a`
pub fn not(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::not(), [a.into()])
}

/// `a == b`, where integers and floats compare by value
pub fn equals(a: impl Into<FunctionArg>, b: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	binary_tree(operators::equals(), a, b)
}

/// `if cond { then } else { otherwise }`.
/// Only the selected branch is evaluated.
pub fn choose(
	cond: impl Into<FunctionArg>,
	then: impl Into<FunctionArg>,
	otherwise: impl Into<FunctionArg>,
) -> Result<Function, BuildError> {
	function_tree(
		operators::if_then_else(),
		[cond.into(), then.into(), otherwise.into()],
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		data::EventData,
		function::{x, y},
	};

	#[test]
	fn sugar_builds_trees() {
		// (x && y) || !x
		let f = or(and(x(), y()).unwrap(), not(x()).unwrap()).unwrap();
		assert_eq!(f.input_arity(), 2);
		assert_eq!(
			f.evaluate(&[false.into(), false.into()]).unwrap(),
			vec![EventData::Boolean(true)]
		);
		assert_eq!(
			f.evaluate(&[true.into(), false.into()]).unwrap(),
			vec![EventData::Boolean(false)]
		);
		assert_eq!(
			f.evaluate(&[true.into(), true.into()]).unwrap(),
			vec![EventData::Boolean(true)]
		);
	}

	#[test]
	fn not_rejects_binary_child() {
		// `not` has arity 1, so `y` (input arity 2) does not fit
		assert!(matches!(
			function_tree(operators::not(), [y().into()]),
			Err(BuildError::ArityMismatch { .. })
		));
	}

	#[test]
	fn choose_picks_branch() {
		let f = function_tree(
			operators::if_then_else(),
			[
				equals(x(), 0).unwrap().into(),
				"zero".into(),
				"nonzero".into(),
			],
		)
		.unwrap();
		assert_eq!(f.evaluate(&[0.into(), 0.into(), 0.into()]).unwrap(), vec![EventData::from("zero")]);
		assert_eq!(
			f.evaluate(&[0.0.into(), 0.into(), 0.into()]).unwrap(),
			vec![EventData::from("zero")]
		);
		assert_eq!(
			f.evaluate(&[1.into(), 0.into(), 0.into()]).unwrap(),
			vec![EventData::from("nonzero")]
		);

		let g = choose(x(), 1, 2).unwrap();
		assert_eq!(g.input_arity(), 3);
	}
}
