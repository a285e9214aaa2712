//! Helpful types for node labels

use serde::Deserialize;
use smartstring::{LazyCompact, SmartString};
use std::fmt::Display;

/// Reserved name for a pipeline's boundary in spec files
pub const PIPELINE_BOUNDARY_NAME: &str = "pipeline";

/// A label for a node inside a group
#[derive(Debug, Hash, PartialEq, Eq, Clone, Deserialize, PartialOrd, Ord)]
pub struct NodeLabel(SmartString<LazyCompact>);

impl NodeLabel {
	/// Is this the reserved boundary name?
	pub fn is_reserved(&self) -> bool {
		self.0 == PIPELINE_BOUNDARY_NAME
	}
}

impl Display for NodeLabel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl AsRef<str> for NodeLabel {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<SmartString<LazyCompact>> for NodeLabel {
	fn from(s: SmartString<LazyCompact>) -> Self {
		NodeLabel(s)
	}
}

impl From<&str> for NodeLabel {
	fn from(s: &str) -> Self {
		NodeLabel(s.into())
	}
}

impl From<String> for NodeLabel {
	fn from(s: String) -> Self {
		NodeLabel(s.into())
	}
}

impl From<NodeLabel> for SmartString<LazyCompact> {
	fn from(value: NodeLabel) -> Self {
		value.0
	}
}

impl<'a> From<&'a NodeLabel> for &'a str {
	fn from(value: &'a NodeLabel) -> Self {
		&value.0
	}
}
