use std::{
	fmt::Debug,
	io::Write,
	sync::{Arc, Mutex, PoisonError},
};

use super::instance::{Outbox, ProcessorInstance};
use crate::{
	data::EventData,
	errors::{FunctionError, RunError},
};

/// A shared writer that `Print` and `Write` sinks write to
#[derive(Clone)]
pub struct SinkTarget(Arc<Mutex<Box<dyn Write + Send>>>);

impl SinkTarget {
	pub fn new(writer: impl Write + Send + 'static) -> Self {
		Self(Arc::new(Mutex::new(Box::new(writer))))
	}

	pub fn stdout() -> Self {
		Self::new(std::io::stdout())
	}

	pub fn stderr() -> Self {
		Self::new(std::io::stderr())
	}
}

impl Debug for SinkTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SinkTarget").finish_non_exhaustive()
	}
}

/// A shared buffer that `Collect` sinks append to.
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct Collector(Arc<Mutex<Vec<EventData>>>);

impl Collector {
	pub fn new() -> Self {
		Self::default()
	}

	/// A copy of every event collected so far
	pub fn events(&self) -> Vec<EventData> {
		self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
	}

	/// Remove and return every event collected so far
	pub fn take(&self) -> Vec<EventData> {
		std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
	}

	pub fn len(&self) -> usize {
		self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn push(&self, data: EventData) {
		self.0
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(data);
	}
}

/// Where a sink sends its events
#[derive(Debug, Clone)]
pub enum SinkKind {
	/// Each event's text form
	Print { target: SinkTarget, newline: bool },

	/// Raw bytes: text as UTF-8, or a list of integers in `0..=255`
	Write { target: SinkTarget },

	Collect(Collector),
}

/// The bytes a `Write` sink emits for `data`
fn raw_bytes(data: &EventData) -> Result<Vec<u8>, FunctionError> {
	let bad_type = |x: &EventData| FunctionError::BadType {
		operator: "Write",
		got: x.type_name(),
	};

	match data {
		EventData::Text(t) => Ok(t.as_bytes().to_vec()),
		EventData::List(items) => items
			.iter()
			.map(|x| match x {
				EventData::Integer(i) => u8::try_from(*i).map_err(|_err| bad_type(x)),
				x => Err(bad_type(x)),
			})
			.collect(),
		x => Err(bad_type(x)),
	}
}

pub(super) struct SinkInstance {
	pub kind: SinkKind,
}

impl ProcessorInstance for SinkInstance {
	fn push(&mut self, _port: usize, data: EventData, _out: &mut Outbox) -> Result<(), RunError> {
		match &self.kind {
			SinkKind::Collect(c) => c.push(data),
			SinkKind::Print { target, newline } => {
				let mut w = target.0.lock().unwrap_or_else(PoisonError::into_inner);
				match newline {
					true => writeln!(w, "{data}")?,
					false => write!(w, "{data}")?,
				}
			}
			SinkKind::Write { target } => {
				let bytes = raw_bytes(&data)?;
				target
					.0
					.lock()
					.unwrap_or_else(PoisonError::into_inner)
					.write_all(&bytes)?;
			}
		}
		Ok(())
	}

	fn finish(&mut self, _out: &mut Outbox) -> Result<(), RunError> {
		if let SinkKind::Print { target, .. } | SinkKind::Write { target } = &self.kind {
			target
				.0
				.lock()
				.unwrap_or_else(PoisonError::into_inner)
				.flush()?;
		}
		Ok(())
	}
}
