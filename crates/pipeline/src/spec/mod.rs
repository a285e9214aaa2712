//! Pipeline spec files.
//!
//! A spec is a TOML description of a [`Group`]. Specs are built through
//! the same factories and connector as hand-written groups, so they are
//! checked exactly the same way.

use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use smartstring::{LazyCompact, SmartString};
use std::{
	collections::HashMap,
	fmt::Display,
	path::{Path, PathBuf},
	str::FromStr,
};
use tracing::{debug, trace};

use crate::{
	data::EventData,
	function::{constant, function_tree, identity_n, stream_variable, Function},
	group::Group,
	labels::NodeLabel,
	lift::FunctionArg,
	lists, maps, operators,
	processor::{Processor, SinkTarget, SlicePolicy},
	strings, tuples,
};

mod errors;
pub use errors::SpecError;

/// A reference to a port in a spec file, written `node.port`.
/// `node` alone means port 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
	pub node: NodeLabel,
	pub port: usize,
}

impl PortSpec {
	/// Is this a port of the pipeline's boundary?
	pub fn is_boundary(&self) -> bool {
		self.node.is_reserved()
	}
}

impl Display for PortSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.node, self.port)
	}
}

impl FromStr for PortSpec {
	type Err = SpecError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bad = |message| SpecError::BadPortRef {
			text: s.into(),
			message,
		};

		let mut i = s.split('.');
		let node = i.next().unwrap_or("");
		let port = i.next();
		if i.next().is_some() {
			return Err(bad("expected `node.port`"));
		}

		if node.is_empty() {
			return Err(bad("node name is empty"));
		}

		let port = match port {
			None => 0,
			Some(p) => p
				.parse::<usize>()
				.map_err(|_err| bad("port must be a non-negative integer"))?,
		};

		Ok(Self {
			node: node.into(),
			port,
		})
	}
}

/// An edge between two ports
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
	#[serde_as(as = "DisplayFromStr")]
	pub from: PortSpec,

	#[serde_as(as = "DisplayFromStr")]
	pub to: PortSpec,
}

/// Extra parameters for parameterized operators
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpParams {
	/// `ToList`
	pub n: Option<usize>,

	/// `SortOn`
	pub key: Option<Box<FunctionSpec>>,

	/// `SplitString`
	pub separator: Option<SmartString<LazyCompact>>,

	/// `Substring`
	pub start: Option<usize>,
	pub end: Option<usize>,

	/// `ReplaceAll`, either one `from`/`to`
	/// or a list of `[from, to]` pairs
	pub from: Option<SmartString<LazyCompact>>,
	pub to: Option<SmartString<LazyCompact>>,
	pub pairs: Option<Vec<(SmartString<LazyCompact>, SmartString<LazyCompact>)>>,

	/// `FindRegex`, `FindRegexOnce`
	pub pattern: Option<SmartString<LazyCompact>>,

	/// `FetchAttribute`, `Get`
	pub name: Option<SmartString<LazyCompact>>,

	/// `MergeScalars`
	pub names: Option<Vec<SmartString<LazyCompact>>>,
}

/// A function in a spec file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FunctionSpec {
	/// `{ var = 0 }`
	Var { var: usize },

	/// `{ identity = 2 }`
	Identity { identity: usize },

	/// `{ op = "Plus", args = [...] }`.
	/// Without `args`, this is the bare operator.
	Op {
		op: SmartString<LazyCompact>,

		#[serde(default)]
		args: Vec<FunctionSpec>,

		#[serde(default)]
		with: OpParams,
	},

	/// Any other value is a constant
	Value(EventData),
}

impl FunctionSpec {
	pub fn build(&self) -> Result<Function, SpecError> {
		match self {
			Self::Var { var } => Ok(stream_variable(*var)),
			Self::Identity { identity } => Ok(identity_n(*identity)),
			Self::Value(v) => Ok(constant(v.clone())),
			Self::Op { op, args, with } => {
				let f = build_operator(op, with)?;
				if args.is_empty() {
					return Ok(f);
				}

				let children = args
					.iter()
					.map(|x| x.build().map(FunctionArg::from))
					.collect::<Result<Vec<_>, _>>()?;
				Ok(function_tree(f, children)?)
			}
		}
	}
}

fn build_operator(op: &str, with: &OpParams) -> Result<Function, SpecError> {
	if let Some(f) = operators::by_name(op) {
		return Ok(f);
	}

	let missing = |message| SpecError::BadOperator {
		op: op.into(),
		message,
	};

	Ok(match op {
		"ToList" => lists::to_list(with.n.ok_or_else(|| missing("missing parameter `n`"))?),
		"SortOn" => {
			let key = with
				.key
				.as_ref()
				.ok_or_else(|| missing("missing parameter `key`"))?;
			lists::sort_on(key.build()?)?
		}
		"SplitString" => strings::split_string(
			with.separator
				.as_ref()
				.ok_or_else(|| missing("missing parameter `separator`"))?,
		),
		"Substring" => strings::substring(with.start.unwrap_or(0), with.end)?,
		"ReplaceAll" => match (&with.pairs, &with.from) {
			(Some(pairs), None) => {
				strings::replace_all_pairs(pairs.iter().map(|(f, t)| (f.as_str(), t.as_str())))?
			}
			(None, Some(from)) => strings::replace_all(from, with.to.as_deref().unwrap_or(""))?,
			(Some(_), Some(_)) => return Err(missing("use either `pairs` or `from`, not both")),
			(None, None) => return Err(missing("missing parameter `from` or `pairs`")),
		},
		"FindRegex" => strings::find_regex(
			with.pattern
				.as_ref()
				.ok_or_else(|| missing("missing parameter `pattern`"))?,
		)?,
		"FindRegexOnce" => strings::find_regex_once(
			with.pattern
				.as_ref()
				.ok_or_else(|| missing("missing parameter `pattern`"))?,
		)?,
		"FetchAttribute" => tuples::fetch_attribute(
			with.name
				.as_ref()
				.ok_or_else(|| missing("missing parameter `name`"))?,
		),
		"Get" => maps::get(
			with.name
				.as_ref()
				.ok_or_else(|| missing("missing parameter `name`"))?,
		),
		"MergeScalars" => tuples::merge_scalars(
			with.names
				.as_ref()
				.ok_or_else(|| missing("missing parameter `names`"))?,
		),
		_ => return Err(missing("unknown operator")),
	})
}

fn default_fork() -> usize {
	2
}

/// A processor in a spec file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
#[serde(deny_unknown_fields)]
pub enum ProcessorSpec {
	ApplyFunction {
		function: FunctionSpec,
	},
	Cumulate {
		function: FunctionSpec,
	},
	Fork {
		#[serde(default = "default_fork")]
		copies: usize,
	},
	Slice {
		key: FunctionSpec,
		processor: Box<ProcessorSpec>,
		#[serde(default)]
		policy: SlicePolicy,
	},
	CountDecimate {
		interval: usize,
	},
	Trim {
		prefix: usize,
	},
	KeepLast,
	TurnInto {
		value: EventData,
	},
	Unpack,
	Pack,
	MapPutInto,
	SetPutInto,
	Source {
		events: Vec<EventData>,
	},
	Print,
	Println,
	Stdout,
	Stderr,

	/// Write raw bytes to a file, truncating it when the spec is built
	Write {
		path: PathBuf,
	},

	/// A nested pipeline
	Group {
		pipeline: Box<PipelineSpec>,
	},
}

impl ProcessorSpec {
	pub fn build(&self) -> Result<Processor, SpecError> {
		Ok(match self {
			Self::ApplyFunction { function } => Processor::apply_function(function.build()?),
			Self::Cumulate { function } => Processor::cumulate(function.build()?)?,
			Self::Fork { copies } => Processor::fork(*copies)?,
			Self::Slice {
				key,
				processor,
				policy,
			} => Processor::slice_with_policy(key.build()?, processor.build()?, *policy)?,
			Self::CountDecimate { interval } => Processor::count_decimate(*interval)?,
			Self::Trim { prefix } => Processor::trim(*prefix),
			Self::KeepLast => Processor::keep_last(),
			Self::TurnInto { value } => Processor::turn_into(value.clone()),
			Self::Unpack => Processor::unpack(),
			Self::Pack => Processor::pack(),
			Self::MapPutInto => Processor::map_put_into(),
			Self::SetPutInto => Processor::set_put_into(),
			Self::Source { events } => Processor::source(events.iter().cloned()),
			Self::Print => Processor::print(),
			Self::Println => Processor::println(),
			Self::Stdout => Processor::stdout(),
			Self::Stderr => Processor::stderr(),
			Self::Write { path } => {
				let file =
					std::fs::File::create(path).map_err(|error| SpecError::CouldNotOpenFile {
						path: path.clone(),
						error,
					})?;
				Processor::write_to(SinkTarget::new(std::io::BufWriter::new(file)))
			}
			Self::Group { pipeline } => pipeline.build()?,
		})
	}
}

/// A node in a spec file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
	pub processor: ProcessorSpec,
}

/// A description of a pipeline
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSpec {
	/// The number of inputs this pipeline has
	#[serde(default)]
	pub inputs: usize,

	/// The number of outputs this pipeline has
	#[serde(default)]
	pub outputs: usize,

	/// Nodes in this pipeline, in the order they were written
	#[serde(default)]
	#[serde(rename = "node")]
	#[serde_as(as = "serde_with::Map<_, _>")]
	pub nodes: Vec<(NodeLabel, NodeSpec)>,

	#[serde(default)]
	#[serde(rename = "edge")]
	pub edges: Vec<EdgeSpec>,
}

impl PipelineSpec {
	/// Load a pipeline spec from a TOML file
	pub fn from_file(path: &Path) -> Result<Self, SpecError> {
		let text = std::fs::read_to_string(path).map_err(|error| SpecError::CouldNotOpenFile {
			path: path.into(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	/// Parse a pipeline spec
	pub fn from_toml_str(text: &str) -> Result<Self, SpecError> {
		toml::from_str(text).map_err(|error| SpecError::CouldNotParseFile { error })
	}

	/// Build this spec into a processor
	pub fn build(&self) -> Result<Processor, SpecError> {
		debug!(
			message = "Building pipeline",
			inputs = self.inputs,
			outputs = self.outputs,
			nodes = self.nodes.len(),
			edges = self.edges.len()
		);

		let mut group = Group::new(self.inputs, self.outputs);
		let mut nodes = HashMap::new();

		trace!(message = "Making nodes");
		for (label, spec) in &self.nodes {
			if label.is_reserved() {
				return Err(SpecError::ReservedName {
					node: label.clone(),
				});
			}

			let processor = spec.processor.build().map_err(|e| SpecError::BadNode {
				node: label.clone(),
				error: Box::new(e),
			})?;

			let idx = group.add_named(label.clone(), processor);
			nodes.insert(label.clone(), idx);
		}

		let find = |label: &NodeLabel| {
			nodes
				.get(label)
				.copied()
				.ok_or_else(|| SpecError::NoNode {
					node: label.clone(),
				})
		};

		trace!(message = "Making edges");
		for edge in &self.edges {
			match (edge.from.is_boundary(), edge.to.is_boundary()) {
				(true, true) => {
					return Err(SpecError::BadEdge {
						from: edge.from.clone(),
						to: edge.to.clone(),
						message: "cannot connect the pipeline to itself",
					})
				}

				(true, false) => {
					group.associate_input(edge.from.port, find(&edge.to.node)?, edge.to.port)?
				}

				(false, true) => group.associate_output(
					edge.to.port,
					find(&edge.from.node)?,
					edge.from.port,
				)?,

				(false, false) => group.connect(
					find(&edge.from.node)?,
					edge.from.port,
					find(&edge.to.node)?,
					edge.to.port,
				)?,
			}
		}

		Ok(group.seal()?)
	}
}

impl FromStr for PipelineSpec {
	type Err = SpecError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_toml_str(s)
	}
}

#[cfg(test)]
mod tests;
