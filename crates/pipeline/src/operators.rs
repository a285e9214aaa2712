//! Shared instances of every parameterless operator.
//!
//! Each of these is built once and shared by every caller,
//! so `operators::plus().ptr_eq(&operators::plus())` holds.

use std::sync::OnceLock;

use crate::function::{Function, FunctionNode, Operator};

macro_rules! shared_operator {
	($(#[$meta:meta])* $name:ident => $op:expr) => {
		$(#[$meta])*
		pub fn $name() -> Function {
			static OP: OnceLock<Function> = OnceLock::new();
			OP.get_or_init(|| Function::new(FunctionNode::Operator($op)))
				.clone()
		}
	};
}

shared_operator!(and => Operator::And);
shared_operator!(or => Operator::Or);
shared_operator!(not => Operator::Not);
shared_operator!(
	/// `a → b`
	implies => Operator::Implies
);
shared_operator!(equals => Operator::Equals);

shared_operator!(plus => Operator::Plus);
shared_operator!(minus => Operator::Minus);
shared_operator!(times => Operator::Times);
shared_operator!(divide => Operator::Division);
shared_operator!(absolute => Operator::Absolute);
shared_operator!(is_even => Operator::IsEven);
shared_operator!(less_than => Operator::LessThan);
shared_operator!(greater_than => Operator::GreaterThan);
shared_operator!(less_or_equal => Operator::LessOrEqual);
shared_operator!(greater_or_equal => Operator::GreaterOrEqual);

shared_operator!(if_then_else => Operator::IfThenElse);

shared_operator!(size => Operator::Size);
shared_operator!(sort => Operator::Sort);

shared_operator!(concat => Operator::Concat);
shared_operator!(to_upper => Operator::ToUpper);
shared_operator!(contains => Operator::Contains);

shared_operator!(values => Operator::Values);
shared_operator!(
	/// (element, set)
	is_element => Operator::IsElement
);
shared_operator!(is_subset_or_equal => Operator::IsSubsetOrEqual);

/// Find a parameterless operator by name
pub fn by_name(name: &str) -> Option<Function> {
	Some(match name {
		"And" => and(),
		"Or" => or(),
		"Not" => not(),
		"Implies" => implies(),
		"Equals" => equals(),
		"Plus" => plus(),
		"Minus" => minus(),
		"Times" => times(),
		"Division" => divide(),
		"Absolute" => absolute(),
		"IsEven" => is_even(),
		"LessThan" => less_than(),
		"GreaterThan" => greater_than(),
		"LessOrEqual" => less_or_equal(),
		"GreaterOrEqual" => greater_or_equal(),
		"IfThenElse" => if_then_else(),
		"Size" => size(),
		"Sort" => sort(),
		"Concat" => concat(),
		"ToUpper" => to_upper(),
		"Contains" => contains(),
		"Values" => values(),
		"IsElement" => is_element(),
		"IsSubsetOrEqual" => is_subset_or_equal(),
		_ => return None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn operators_are_shared() {
		assert!(plus().ptr_eq(&plus()));
		assert!(!plus().ptr_eq(&minus()));
		assert!(by_name("Plus").unwrap().ptr_eq(&plus()));
		assert!(by_name("plus").is_none());
	}

	#[test]
	fn names_round_trip() {
		for name in ["And", "Division", "IfThenElse", "Contains", "Values", "IsElement"] {
			let f = by_name(name).unwrap();
			assert_eq!(f.as_operator().unwrap().name(), name);
		}
	}
}
