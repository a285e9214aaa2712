//! Event data that flows through a pipeline

use itertools::Itertools;
use serde::Deserialize;
use smartstring::{LazyCompact, SmartString};
use std::{cmp::Ordering, collections::BTreeMap, fmt::Display, sync::Arc};

/// An immutable event inside a pipeline.
///
/// Cloning [`EventData`] should be very fast,
/// containers are wrapped in an [`Arc`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EventData {
	/// A boolean
	Boolean(bool),

	/// An integer
	Integer(i64),

	/// A float
	Float(f64),

	/// A block of text
	Text(SmartString<LazyCompact>),

	/// An ordered list of events
	List(Arc<Vec<EventData>>),

	/// Named events, sorted by key.
	/// This is the tuple type used by `FetchAttribute` and `MergeScalars`.
	Map(Arc<BTreeMap<SmartString<LazyCompact>, EventData>>),

	/// No value.
	/// TOML cannot express this, so it is never deserialized.
	#[serde(skip_deserializing)]
	None,
}

impl EventData {
	/// A short name for this event's type, used in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Boolean(_) => "boolean",
			Self::Integer(_) => "integer",
			Self::Float(_) => "float",
			Self::Text(_) => "text",
			Self::List(_) => "list",
			Self::Map(_) => "map",
		}
	}

	pub fn list(items: Vec<EventData>) -> Self {
		Self::List(Arc::new(items))
	}

	pub fn map(items: BTreeMap<SmartString<LazyCompact>, EventData>) -> Self {
		Self::Map(Arc::new(items))
	}

	/// Is this a number (integer or float)?
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Integer(_) | Self::Float(_))
	}

	/// Compare two events.
	///
	/// Numbers compare by value (integers and floats mix),
	/// text compares lexicographically, lists compare element-wise.
	/// Events of different kinds are ordered by kind.
	pub fn total_cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::Integer(a), Self::Integer(b)) => a.cmp(b),
			(Self::Integer(a), Self::Float(b)) => (*a as f64).total_cmp(b),
			(Self::Float(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
			(Self::Float(a), Self::Float(b)) => a.total_cmp(b),
			(Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
			(Self::Text(a), Self::Text(b)) => a.cmp(b),
			(Self::List(a), Self::List(b)) => {
				for (x, y) in a.iter().zip(b.iter()) {
					match x.total_cmp(y) {
						Ordering::Equal => {}
						o => return o,
					}
				}
				a.len().cmp(&b.len())
			}
			(Self::Map(a), Self::Map(b)) => {
				for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
					match ka.cmp(kb).then_with(|| va.total_cmp(vb)) {
						Ordering::Equal => {}
						o => return o,
					}
				}
				a.len().cmp(&b.len())
			}
			(Self::None, Self::None) => Ordering::Equal,
			_ => self.kind_rank().cmp(&other.kind_rank()),
		}
	}

	/// Loose equality: like `==`, but `1` equals `1.0`.
	pub fn loose_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Integer(_), Self::Float(_)) | (Self::Float(_), Self::Integer(_)) => {
				self.total_cmp(other) == Ordering::Equal
			}
			_ => self == other,
		}
	}

	fn kind_rank(&self) -> u8 {
		match self {
			Self::None => 0,
			Self::Boolean(_) => 1,
			Self::Integer(_) | Self::Float(_) => 2,
			Self::Text(_) => 3,
			Self::List(_) => 4,
			Self::Map(_) => 5,
		}
	}
}

impl Display for EventData {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::None => write!(f, "none"),
			Self::Boolean(x) => write!(f, "{x}"),
			Self::Integer(x) => write!(f, "{x}"),
			Self::Float(x) => write!(f, "{x}"),
			Self::Text(x) => write!(f, "{x}"),
			Self::List(x) => write!(f, "[{}]", x.iter().join(", ")),
			Self::Map(x) => write!(
				f,
				"{{{}}}",
				x.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")
			),
		}
	}
}

impl From<bool> for EventData {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

impl From<i64> for EventData {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<i32> for EventData {
	fn from(value: i32) -> Self {
		Self::Integer(value.into())
	}
}

impl From<f64> for EventData {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for EventData {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}

impl From<String> for EventData {
	fn from(value: String) -> Self {
		Self::Text(value.into())
	}
}

impl From<SmartString<LazyCompact>> for EventData {
	fn from(value: SmartString<LazyCompact>) -> Self {
		Self::Text(value)
	}
}

impl From<Vec<EventData>> for EventData {
	fn from(value: Vec<EventData>) -> Self {
		Self::list(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserialize_from_toml() {
		#[derive(Deserialize)]
		struct Holder {
			a: EventData,
			b: EventData,
			c: EventData,
			d: EventData,
			e: EventData,
		}

		let h: Holder =
			toml::from_str("a = 1\nb = 2.5\nc = \"x\"\nd = [true, 3]\ne = { k = \"v\" }").unwrap();
		assert_eq!(h.a, EventData::Integer(1));
		assert_eq!(h.b, EventData::Float(2.5));
		assert_eq!(h.c, EventData::from("x"));
		assert_eq!(
			h.d,
			EventData::list(vec![EventData::Boolean(true), EventData::Integer(3)])
		);
		assert_eq!(h.e.to_string(), "{k: v}");
	}

	#[test]
	fn numbers_compare_across_kinds() {
		assert!(EventData::Integer(1).loose_eq(&EventData::Float(1.0)));
		assert_ne!(EventData::Integer(1), EventData::Float(1.0));
		assert_eq!(
			EventData::Integer(2).total_cmp(&EventData::Float(1.5)),
			Ordering::Greater
		);
		assert_eq!(
			EventData::from("b").total_cmp(&EventData::Integer(100)),
			Ordering::Greater
		);
	}

	#[test]
	fn display() {
		let l = EventData::list(vec![1.into(), "a".into(), EventData::None]);
		assert_eq!(l.to_string(), "[1, a, none]");
	}
}
