//! Arithmetic and numeric comparisons.
//!
//! Integers stay integers unless mixed with a float.
//! [`divide`] always produces a float.

use crate::{
	errors::BuildError,
	function::{binary_tree, function_tree, Function},
	lift::FunctionArg,
	operators,
};

macro_rules! binary_sugar {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		pub fn $name(
			a: impl Into<FunctionArg>,
			b: impl Into<FunctionArg>,
		) -> Result<Function, BuildError> {
			binary_tree(operators::$name(), a, b)
		}
	};
}

binary_sugar!(
	/// `a + b`
	plus
);
binary_sugar!(
	/// `a - b`
	minus
);
binary_sugar!(
	/// `a * b`
	times
);
binary_sugar!(
	/// `a / b`
	divide
);
binary_sugar!(
	/// `a < b`
	less_than
);
binary_sugar!(
	/// `a > b`
	greater_than
);
binary_sugar!(
	/// `a <= b`
	less_or_equal
);
binary_sugar!(
	/// `a >= b`
	greater_or_equal
);

/// `|a|`
pub fn absolute(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::absolute(), [a.into()])
}

/// Is `a` an even integer?
pub fn is_even(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::is_even(), [a.into()])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		data::EventData,
		errors::FunctionError,
		function::{x, y},
	};

	#[test]
	fn nested_arithmetic() {
		// (x * 2) - (y / 4)
		let f = minus(times(x(), 2).unwrap(), divide(y(), 4).unwrap()).unwrap();
		assert_eq!(f.input_arity(), 2);
		assert_eq!(
			f.evaluate(&[5.into(), 2.into()]).unwrap(),
			vec![EventData::Float(9.5)]
		);
	}

	#[test]
	fn comparison_sugar() {
		let f = less_than(x(), y()).unwrap();
		assert_eq!(
			f.evaluate(&[1.into(), 2.into()]).unwrap(),
			vec![EventData::Boolean(true)]
		);
		let f = greater_or_equal(x(), 3).unwrap();
		assert_eq!(
			f.evaluate(&[3.into(), 0.into()]).unwrap(),
			vec![EventData::Boolean(true)]
		);
	}

	#[test]
	fn unary() {
		assert_eq!(
			absolute(-4).unwrap().evaluate(&[]).unwrap(),
			vec![EventData::Integer(4)]
		);
		assert_eq!(
			is_even(x()).unwrap().evaluate(&[6.into()]).unwrap(),
			vec![EventData::Boolean(true)]
		);
		assert!(matches!(
			is_even(x()).unwrap().evaluate(&[6.5.into()]),
			Err(FunctionError::BadType { .. })
		));
	}
}
