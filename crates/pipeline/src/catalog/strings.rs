//! Text functions

use regex::Regex;

use crate::{
	errors::BuildError,
	function::{binary_tree, function_tree, Function, FunctionNode, Operator},
	lift::FunctionArg,
	operators,
};

/// An operator that splits text on `separator`
pub fn split_string(separator: &str) -> Function {
	Function::new(FunctionNode::Operator(Operator::SplitString(
		separator.into(),
	)))
}

/// An operator that takes the characters `[start, end)` of its input.
/// `end = None` takes everything after `start`.
pub fn substring(start: usize, end: Option<usize>) -> Result<Function, BuildError> {
	if let Some(end) = end {
		if end < start {
			return Err(BuildError::parameter(
				"end",
				"substring end must not come before its start",
			));
		}
	}
	Ok(Function::new(FunctionNode::Operator(Operator::Substring {
		start,
		end,
	})))
}

/// An operator that replaces every `from` with `to`
pub fn replace_all(from: &str, to: &str) -> Result<Function, BuildError> {
	replace_all_pairs([(from, to)])
}

/// An operator that applies several literal replacements in order.
/// Each replacement sees the output of the one before it.
pub fn replace_all_pairs<'a>(
	pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Function, BuildError> {
	let pairs = pairs
		.into_iter()
		.map(|(from, to)| {
			if from.is_empty() {
				return Err(BuildError::parameter("from", "cannot replace an empty string"));
			}
			Ok((from.into(), to.into()))
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Function::new(FunctionNode::Operator(Operator::ReplaceAll(
		pairs,
	))))
}

/// An operator that finds every match of `pattern` in its input.
/// If the pattern has a capture group, each match is replaced by its first group.
pub fn find_regex(pattern: &str) -> Result<Function, BuildError> {
	Ok(Function::new(FunctionNode::Operator(Operator::FindRegex(
		compile(pattern)?,
	))))
}

/// Like [`find_regex`], but only the first match.
/// Inputs without a match produce none.
pub fn find_regex_once(pattern: &str) -> Result<Function, BuildError> {
	Ok(Function::new(FunctionNode::Operator(Operator::FindRegexOnce(
		compile(pattern)?,
	))))
}

fn compile(pattern: &str) -> Result<Regex, BuildError> {
	Regex::new(pattern).map_err(|e| BuildError::parameter("pattern", &e.to_string()))
}

/// `a ++ b`, for text or lists
pub fn concat(a: impl Into<FunctionArg>, b: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	binary_tree(operators::concat(), a, b)
}

/// Does `a` contain `b`?
pub fn contains(
	a: impl Into<FunctionArg>,
	b: impl Into<FunctionArg>,
) -> Result<Function, BuildError> {
	binary_tree(operators::contains(), a, b)
}

pub fn to_upper(a: impl Into<FunctionArg>) -> Result<Function, BuildError> {
	function_tree(operators::to_upper(), [a.into()])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		data::EventData,
		function::{x, y},
	};

	#[test]
	fn compose_text() {
		// upper(x) ++ "-" ++ y
		let f = concat(concat(to_upper(x()).unwrap(), "-").unwrap(), y()).unwrap();
		assert_eq!(
			f.evaluate(&["ab".into(), "cd".into()]).unwrap(),
			vec![EventData::from("AB-cd")]
		);
	}

	#[test]
	fn parameters_are_checked() {
		assert!(matches!(
			substring(3, Some(1)),
			Err(BuildError::InvalidParameter { .. })
		));
		assert!(replace_all("", "x").is_err());
		assert!(replace_all_pairs([("a", "b"), ("", "c")]).is_err());
		assert!(matches!(
			find_regex("(unclosed"),
			Err(BuildError::InvalidParameter { .. })
		));

		let f = function_tree(substring(1, None).unwrap(), [x().into()]).unwrap();
		assert_eq!(
			f.evaluate(&["abc".into()]).unwrap(),
			vec![EventData::from("bc")]
		);
	}

	#[test]
	fn split() {
		let f = split_string(" ");
		assert_eq!(
			f.evaluate(&["a b".into()]).unwrap(),
			vec![EventData::list(vec!["a".into(), "b".into()])]
		);
	}

	#[test]
	fn regex_in_trees() {
		// Every number in the input, then the first one
		let all = function_tree(find_regex("[0-9]+").unwrap(), [x().into()]).unwrap();
		let first = function_tree(find_regex_once("[0-9]+").unwrap(), [x().into()]).unwrap();
		let input = EventData::from("v1.22");
		assert_eq!(
			all.evaluate(&[input.clone()]).unwrap(),
			vec![EventData::list(vec!["1".into(), "22".into()])]
		);
		assert_eq!(first.evaluate(&[input]).unwrap(), vec![EventData::from("1")]);
	}

	#[test]
	fn replace_pairs_in_order() {
		let f = replace_all_pairs([("<", "&lt;"), (">", "&gt;")]).unwrap();
		assert_eq!(
			f.evaluate(&["<a>".into()]).unwrap(),
			vec![EventData::from("&lt;a&gt;")]
		);
	}
}
