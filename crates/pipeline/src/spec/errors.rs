//! Errors we may encounter while loading a pipeline spec

use smartstring::{LazyCompact, SmartString};
use std::path::PathBuf;
use thiserror::Error;

use super::PortSpec;
use crate::{errors::BuildError, labels::NodeLabel};

/// An error we encounter when a pipeline spec is invalid
#[derive(Debug, Error)]
pub enum SpecError {
	/// We could not open a pipeline spec file
	#[error("could not open `{path}`")]
	CouldNotOpenFile {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	/// We could not parse a pipeline spec file
	#[error("could not parse pipeline spec")]
	CouldNotParseFile {
		#[source]
		error: toml::de::Error,
	},

	/// An edge references a node that doesn't exist
	#[error("there is no node named `{node}`")]
	NoNode { node: NodeLabel },

	/// We could not parse a `node.port` reference
	#[error("bad port reference `{text}`: {message}")]
	BadPortRef {
		text: SmartString<LazyCompact>,
		message: &'static str,
	},

	/// A node uses the name reserved for the pipeline boundary
	#[error("`{node}` is a reserved name")]
	ReservedName { node: NodeLabel },

	/// An edge we cannot build
	#[error("bad edge `{from}` -> `{to}`: {message}")]
	BadEdge {
		from: PortSpec,
		to: PortSpec,
		message: &'static str,
	},

	/// A function references an operator we don't know,
	/// or is missing a parameter that operator needs
	#[error("bad operator `{op}`: {message}")]
	BadOperator {
		op: SmartString<LazyCompact>,
		message: &'static str,
	},

	/// We could not build a node
	#[error("could not build node `{node}`")]
	BadNode {
		node: NodeLabel,
		#[source]
		error: Box<SpecError>,
	},

	/// We could not connect this pipeline's nodes
	#[error("could not build pipeline")]
	Build(#[from] BuildError),
}
