use regex::Regex;
use smartstring::{LazyCompact, SmartString};
use std::{cmp::Ordering, collections::BTreeMap};

use super::Function;
use crate::{data::EventData, errors::FunctionError};

/// A primitive operation from the function catalog.
///
/// Parameterless operators are shared through the singletons in
/// [`crate::operators`]; parameterized ones are built by the namespace
/// factories (see [`crate::lists`], [`crate::strings`], [`crate::maps`]).
#[derive(Debug, Clone)]
pub enum Operator {
	// Booleans
	And,
	Or,
	Not,
	Implies,

	/// Loose equality, see [`EventData::loose_eq`]
	Equals,

	// Numbers
	Plus,
	Minus,
	Times,
	/// Always produces a float
	Division,
	Absolute,
	IsEven,
	LessThan,
	GreaterThan,
	LessOrEqual,
	GreaterOrEqual,

	/// (condition, then, else)
	IfThenElse,

	// Lists
	/// Collect `n` inputs into a list
	ToList(usize),
	Size,
	Sort,
	/// Sort a list by the value of a unary function
	SortOn(Function),

	// Strings
	SplitString(SmartString<LazyCompact>),
	/// Character range `[start, end)`. `end = None` means "to the end".
	Substring {
		start: usize,
		end: Option<usize>,
	},
	/// Literal `(from, to)` replacements, applied in order
	ReplaceAll(Vec<(SmartString<LazyCompact>, SmartString<LazyCompact>)>),
	/// Every match of a pattern, as a list.
	/// If the pattern has a capture group, each match is its first group.
	FindRegex(Regex),
	/// Like [`Operator::FindRegex`], but only the first match (or none)
	FindRegexOnce(Regex),
	Concat,
	ToUpper,
	Contains,

	// Tuples
	FetchAttribute(SmartString<LazyCompact>),
	/// Build a map from `names.len()` inputs
	MergeScalars(Vec<SmartString<LazyCompact>>),

	// Maps
	/// The values of a map, in key order
	Values,

	// Sets
	/// (element, set)
	IsElement,
	IsSubsetOrEqual,
}

impl Operator {
	/// This operator's name, as used in errors and pipeline spec files
	pub fn name(&self) -> &'static str {
		match self {
			Self::And => "And",
			Self::Or => "Or",
			Self::Not => "Not",
			Self::Implies => "Implies",
			Self::Equals => "Equals",
			Self::Plus => "Plus",
			Self::Minus => "Minus",
			Self::Times => "Times",
			Self::Division => "Division",
			Self::Absolute => "Absolute",
			Self::IsEven => "IsEven",
			Self::LessThan => "LessThan",
			Self::GreaterThan => "GreaterThan",
			Self::LessOrEqual => "LessOrEqual",
			Self::GreaterOrEqual => "GreaterOrEqual",
			Self::IfThenElse => "IfThenElse",
			Self::ToList(_) => "ToList",
			Self::Size => "Size",
			Self::Sort => "Sort",
			Self::SortOn(_) => "SortOn",
			Self::SplitString(_) => "SplitString",
			Self::Substring { .. } => "Substring",
			Self::ReplaceAll(_) => "ReplaceAll",
			Self::FindRegex(_) => "FindRegex",
			Self::FindRegexOnce(_) => "FindRegexOnce",
			Self::Concat => "Concat",
			Self::ToUpper => "ToUpper",
			Self::Contains => "Contains",
			Self::FetchAttribute(_) => "FetchAttribute",
			Self::MergeScalars(_) => "MergeScalars",
			Self::Values => "Values",
			Self::IsElement => "IsElement",
			Self::IsSubsetOrEqual => "IsSubsetOrEqual",
		}
	}

	pub fn input_arity(&self) -> usize {
		match self {
			Self::Not
			| Self::Absolute
			| Self::IsEven
			| Self::Size
			| Self::Sort
			| Self::SortOn(_)
			| Self::SplitString(_)
			| Self::Substring { .. }
			| Self::ReplaceAll(_)
			| Self::FindRegex(_)
			| Self::FindRegexOnce(_)
			| Self::ToUpper
			| Self::FetchAttribute(_)
			| Self::Values => 1,

			Self::And
			| Self::Or
			| Self::Implies
			| Self::Equals
			| Self::Plus
			| Self::Minus
			| Self::Times
			| Self::Division
			| Self::LessThan
			| Self::GreaterThan
			| Self::LessOrEqual
			| Self::GreaterOrEqual
			| Self::Concat
			| Self::Contains
			| Self::IsElement
			| Self::IsSubsetOrEqual => 2,

			Self::IfThenElse => 3,

			Self::ToList(n) => *n,
			Self::MergeScalars(names) => names.len(),
		}
	}

	fn bad_type(&self, got: &EventData) -> FunctionError {
		FunctionError::BadType {
			operator: self.name(),
			got: got.type_name(),
		}
	}

	fn boolean(&self, x: &EventData) -> Result<bool, FunctionError> {
		match x {
			EventData::Boolean(b) => Ok(*b),
			x => Err(self.bad_type(x)),
		}
	}

	fn text<'a>(&self, x: &'a EventData) -> Result<&'a str, FunctionError> {
		match x {
			EventData::Text(t) => Ok(t),
			x => Err(self.bad_type(x)),
		}
	}

	fn list<'a>(&self, x: &'a EventData) -> Result<&'a [EventData], FunctionError> {
		match x {
			EventData::List(l) => Ok(l.as_slice()),
			x => Err(self.bad_type(x)),
		}
	}

	fn float(&self, x: &EventData) -> Result<f64, FunctionError> {
		match x {
			EventData::Integer(i) => Ok(*i as f64),
			EventData::Float(f) => Ok(*f),
			x => Err(self.bad_type(x)),
		}
	}

	/// Integer arithmetic if both sides are integers, float arithmetic otherwise.
	fn arithmetic(
		&self,
		a: &EventData,
		b: &EventData,
		int: fn(i64, i64) -> Option<i64>,
		float: fn(f64, f64) -> f64,
	) -> Result<EventData, FunctionError> {
		match (a, b) {
			(EventData::Integer(a), EventData::Integer(b)) => int(*a, *b)
				.map(EventData::Integer)
				.ok_or(FunctionError::Overflow {
					operator: self.name(),
				}),
			_ => Ok(EventData::Float(float(self.float(a)?, self.float(b)?))),
		}
	}

	/// Numbers compare with numbers, text compares with text.
	fn compare(&self, a: &EventData, b: &EventData) -> Result<Ordering, FunctionError> {
		match (a, b) {
			(EventData::Text(_), EventData::Text(_)) => Ok(a.total_cmp(b)),
			_ if a.is_numeric() && b.is_numeric() => Ok(a.total_cmp(b)),
			(x, _) if !x.is_numeric() && !matches!(x, EventData::Text(_)) => Err(self.bad_type(x)),
			(_, y) => Err(self.bad_type(y)),
		}
	}

	/// The matches of `re` in `text`, see [`Operator::FindRegex`]
	fn find_matches<'a>(re: &'a Regex, text: &'a str) -> impl Iterator<Item = EventData> + 'a {
		let group = usize::from(re.captures_len() > 1);
		re.captures_iter(text)
			.filter_map(move |c| c.get(group))
			.map(|m| EventData::from(m.as_str()))
	}

	/// Apply this operator to exactly [`Operator::input_arity`] arguments.
	pub(crate) fn apply(&self, args: &[EventData]) -> Result<EventData, FunctionError> {
		if args.len() < self.input_arity() {
			return Err(FunctionError::NotEnoughInputs {
				expected: self.input_arity(),
				got: args.len(),
			});
		}

		Ok(match self {
			Self::And => (self.boolean(&args[0])? && self.boolean(&args[1])?).into(),
			Self::Or => (self.boolean(&args[0])? || self.boolean(&args[1])?).into(),
			Self::Not => (!self.boolean(&args[0])?).into(),
			Self::Implies => (!self.boolean(&args[0])? || self.boolean(&args[1])?).into(),
			Self::Equals => args[0].loose_eq(&args[1]).into(),

			Self::Plus => self.arithmetic(&args[0], &args[1], i64::checked_add, |a, b| a + b)?,
			Self::Minus => self.arithmetic(&args[0], &args[1], i64::checked_sub, |a, b| a - b)?,
			Self::Times => self.arithmetic(&args[0], &args[1], i64::checked_mul, |a, b| a * b)?,
			Self::Division => {
				let a = self.float(&args[0])?;
				let b = self.float(&args[1])?;
				if b == 0.0 {
					return Err(FunctionError::DivisionByZero);
				}
				EventData::Float(a / b)
			}
			Self::Absolute => match &args[0] {
				EventData::Integer(i) => {
					EventData::Integer(i.checked_abs().ok_or(FunctionError::Overflow {
						operator: self.name(),
					})?)
				}
				EventData::Float(f) => EventData::Float(f.abs()),
				x => return Err(self.bad_type(x)),
			},
			Self::IsEven => match &args[0] {
				EventData::Integer(i) => (i % 2 == 0).into(),
				x => return Err(self.bad_type(x)),
			},

			Self::LessThan => (self.compare(&args[0], &args[1])? == Ordering::Less).into(),
			Self::GreaterThan => (self.compare(&args[0], &args[1])? == Ordering::Greater).into(),
			Self::LessOrEqual => (self.compare(&args[0], &args[1])? != Ordering::Greater).into(),
			Self::GreaterOrEqual => (self.compare(&args[0], &args[1])? != Ordering::Less).into(),

			// Outside of a tree there is nothing to short-circuit
			Self::IfThenElse => match self.boolean(&args[0])? {
				true => args[1].clone(),
				false => args[2].clone(),
			},

			Self::ToList(n) => EventData::list(args[..*n].to_vec()),
			Self::Size => match &args[0] {
				EventData::List(l) => EventData::Integer(l.len() as i64),
				EventData::Map(m) => EventData::Integer(m.len() as i64),
				EventData::Text(t) => EventData::Integer(t.chars().count() as i64),
				x => return Err(self.bad_type(x)),
			},
			Self::Sort => match &args[0] {
				EventData::List(l) => {
					let mut v = (**l).clone();
					v.sort_by(EventData::total_cmp);
					EventData::list(v)
				}
				x => return Err(self.bad_type(x)),
			},
			Self::SortOn(key) => match &args[0] {
				EventData::List(l) => {
					let mut keyed = l
						.iter()
						.map(|x| Ok((key.evaluate_single(std::slice::from_ref(x))?, x.clone())))
						.collect::<Result<Vec<_>, FunctionError>>()?;
					keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
					EventData::list(keyed.into_iter().map(|(_, x)| x).collect())
				}
				x => return Err(self.bad_type(x)),
			},

			Self::SplitString(sep) => EventData::list(
				self.text(&args[0])?
					.split(sep.as_str())
					.map(EventData::from)
					.collect(),
			),
			Self::Substring { start, end } => {
				let t = self.text(&args[0])?;
				let take = end.map(|e| e.saturating_sub(*start)).unwrap_or(usize::MAX);
				t.chars().skip(*start).take(take).collect::<String>().into()
			}
			Self::ReplaceAll(pairs) => pairs
				.iter()
				.fold(self.text(&args[0])?.to_owned(), |t, (from, to)| {
					t.replace(from.as_str(), to)
				})
				.into(),
			Self::FindRegex(re) => {
				EventData::list(Self::find_matches(re, self.text(&args[0])?).collect())
			}
			Self::FindRegexOnce(re) => Self::find_matches(re, self.text(&args[0])?)
				.next()
				.unwrap_or(EventData::None),
			Self::Concat => match (&args[0], &args[1]) {
				(EventData::Text(a), EventData::Text(b)) => {
					let mut s = a.clone();
					s.push_str(b);
					EventData::Text(s)
				}
				(EventData::List(a), EventData::List(b)) => {
					EventData::list(a.iter().chain(b.iter()).cloned().collect())
				}
				(EventData::Text(_) | EventData::List(_), y) => return Err(self.bad_type(y)),
				(x, _) => return Err(self.bad_type(x)),
			},
			Self::ToUpper => self.text(&args[0])?.to_uppercase().into(),
			Self::Contains => match &args[0] {
				EventData::Text(t) => t.contains(self.text(&args[1])?).into(),
				EventData::List(l) => l.iter().any(|x| x.loose_eq(&args[1])).into(),
				x => return Err(self.bad_type(x)),
			},

			Self::FetchAttribute(name) => match &args[0] {
				EventData::Map(m) => m.get(name).cloned().unwrap_or(EventData::None),
				x => return Err(self.bad_type(x)),
			},
			Self::MergeScalars(names) => EventData::map(
				names
					.iter()
					.cloned()
					.zip(args.iter().cloned())
					.collect::<BTreeMap<_, _>>(),
			),

			Self::Values => match &args[0] {
				EventData::Map(m) => EventData::list(m.values().cloned().collect()),
				x => return Err(self.bad_type(x)),
			},

			Self::IsElement => self
				.list(&args[1])?
				.iter()
				.any(|x| x.loose_eq(&args[0]))
				.into(),
			Self::IsSubsetOrEqual => {
				let b = self.list(&args[1])?;
				self.list(&args[0])?
					.iter()
					.all(|x| b.iter().any(|y| y.loose_eq(x)))
					.into()
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::function::{constant, identity};

	fn apply(op: Operator, args: &[EventData]) -> Result<EventData, FunctionError> {
		op.apply(args)
	}

	#[test]
	fn arithmetic_promotes() {
		assert_eq!(
			apply(Operator::Plus, &[1.into(), 2.into()]),
			Ok(EventData::Integer(3))
		);
		assert_eq!(
			apply(Operator::Plus, &[1.into(), 0.5.into()]),
			Ok(EventData::Float(1.5))
		);
		assert_eq!(
			apply(Operator::Division, &[3.into(), 2.into()]),
			Ok(EventData::Float(1.5))
		);
		assert_eq!(
			apply(Operator::Division, &[3.into(), 0.into()]),
			Err(FunctionError::DivisionByZero)
		);
		assert_eq!(
			apply(Operator::Times, &[i64::MAX.into(), 2.into()]),
			Err(FunctionError::Overflow { operator: "Times" })
		);
		assert!(matches!(
			apply(Operator::Minus, &["a".into(), 2.into()]),
			Err(FunctionError::BadType { got: "text", .. })
		));
	}

	#[test]
	fn comparisons() {
		assert_eq!(
			apply(Operator::LessThan, &[1.into(), 1.5.into()]),
			Ok(true.into())
		);
		assert_eq!(
			apply(Operator::GreaterOrEqual, &["b".into(), "a".into()]),
			Ok(true.into())
		);
		assert_eq!(
			apply(Operator::LessOrEqual, &[2.into(), 2.0.into()]),
			Ok(true.into())
		);
		assert!(apply(Operator::LessThan, &["a".into(), 1.into()]).is_err());
		assert_eq!(
			apply(Operator::Equals, &[2.into(), 2.0.into()]),
			Ok(true.into())
		);
		assert_eq!(
			apply(Operator::Equals, &["2".into(), 2.into()]),
			Ok(false.into())
		);
	}

	#[test]
	fn booleans() {
		assert_eq!(
			apply(Operator::Implies, &[false.into(), false.into()]),
			Ok(true.into())
		);
		assert_eq!(
			apply(Operator::Implies, &[true.into(), false.into()]),
			Ok(false.into())
		);
		assert!(apply(Operator::And, &[true.into(), 1.into()]).is_err());
	}

	#[test]
	fn lists() {
		let l = EventData::list(vec![3.into(), 1.into(), 2.into()]);
		assert_eq!(
			apply(Operator::Sort, &[l.clone()]),
			Ok(EventData::list(vec![1.into(), 2.into(), 3.into()]))
		);
		assert_eq!(apply(Operator::Size, &[l.clone()]), Ok(3.into()));
		assert_eq!(apply(Operator::Contains, &[l.clone(), 2.0.into()]), Ok(true.into()));
		assert_eq!(
			apply(Operator::ToList(2), &["a".into(), "b".into()]),
			Ok(EventData::list(vec!["a".into(), "b".into()]))
		);

		// Sorting on a constant key keeps the original order
		assert_eq!(
			apply(Operator::SortOn(constant(0)), &[l.clone()]),
			Ok(l.clone())
		);
		assert_eq!(
			apply(Operator::SortOn(identity()), &[l]),
			Ok(EventData::list(vec![1.into(), 2.into(), 3.into()]))
		);
	}

	#[test]
	fn strings() {
		assert_eq!(
			apply(Operator::SplitString(",".into()), &["a,b,,c".into()]),
			Ok(EventData::list(vec![
				"a".into(),
				"b".into(),
				"".into(),
				"c".into()
			]))
		);
		assert_eq!(
			apply(
				Operator::Substring {
					start: 1,
					end: Some(3)
				},
				&["héllo".into()]
			),
			Ok("él".into())
		);
		assert_eq!(
			apply(
				Operator::Substring {
					start: 2,
					end: None
				},
				&["hello".into()]
			),
			Ok("llo".into())
		);
		assert_eq!(
			apply(
				Operator::ReplaceAll(vec![("o".into(), "0".into())]),
				&["foo".into()]
			),
			Ok("f00".into())
		);

		// Pairs apply in order, each to the previous result
		assert_eq!(
			apply(
				Operator::ReplaceAll(vec![("a".into(), "b".into()), ("b".into(), "c".into())]),
				&["ab".into()]
			),
			Ok("cc".into())
		);
		assert_eq!(
			apply(Operator::Concat, &["ab".into(), "cd".into()]),
			Ok("abcd".into())
		);
		assert_eq!(apply(Operator::ToUpper, &["ab".into()]), Ok("AB".into()));
		assert_eq!(
			apply(Operator::Contains, &["abc".into(), "bc".into()]),
			Ok(true.into())
		);
	}

	#[test]
	fn tuples() {
		let m = apply(
			Operator::MergeScalars(vec!["a".into(), "b".into()]),
			&[1.into(), "x".into()],
		)
		.unwrap();
		assert_eq!(m.to_string(), "{a: 1, b: x}");
		assert_eq!(
			apply(Operator::FetchAttribute("b".into()), &[m.clone()]),
			Ok("x".into())
		);
		assert_eq!(
			apply(Operator::FetchAttribute("c".into()), &[m]),
			Ok(EventData::None)
		);
	}

	#[test]
	fn find_regex() {
		let digits = Regex::new("[0-9]+").unwrap();
		assert_eq!(
			Operator::FindRegex(digits.clone()).apply(&["a1b22c".into()]),
			Ok(EventData::list(vec!["1".into(), "22".into()]))
		);
		assert_eq!(
			Operator::FindRegexOnce(digits.clone()).apply(&["a1b22c".into()]),
			Ok("1".into())
		);
		assert_eq!(
			Operator::FindRegexOnce(digits).apply(&["abc".into()]),
			Ok(EventData::None)
		);

		// With a group, matches are the group's text
		let keyed = Regex::new("k=([a-z]+)").unwrap();
		assert_eq!(
			Operator::FindRegex(keyed).apply(&["k=ab, k=c".into()]),
			Ok(EventData::list(vec!["ab".into(), "c".into()]))
		);

		assert!(matches!(
			Operator::FindRegex(Regex::new("a").unwrap()).apply(&[1.into()]),
			Err(FunctionError::BadType { got: "integer", .. })
		));
	}

	#[test]
	fn maps_and_sets() {
		let m = Operator::MergeScalars(vec!["b".into(), "a".into()])
			.apply(&[1.into(), 2.into()])
			.unwrap();
		assert_eq!(
			Operator::Values.apply(&[m]),
			Ok(EventData::list(vec![2.into(), 1.into()]))
		);

		let set = EventData::list(vec![1.into(), 2.into(), "x".into()]);
		assert_eq!(
			Operator::IsElement.apply(&[2.0.into(), set.clone()]),
			Ok(true.into())
		);
		assert_eq!(
			Operator::IsElement.apply(&["y".into(), set.clone()]),
			Ok(false.into())
		);
		assert_eq!(
			Operator::IsSubsetOrEqual.apply(&[EventData::list(vec!["x".into(), 1.into()]), set.clone()]),
			Ok(true.into())
		);
		assert_eq!(
			Operator::IsSubsetOrEqual.apply(&[set.clone(), EventData::list(vec![1.into()])]),
			Ok(false.into())
		);
		assert!(Operator::IsElement.apply(&[1.into(), 1.into()]).is_err());
	}
}
