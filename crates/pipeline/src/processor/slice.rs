use serde::Deserialize;
use smartstring::{LazyCompact, SmartString};
use std::{cmp::Ordering, collections::BTreeMap};
use tracing::debug;

use super::{
	instance::{Outbox, ProcessorInstance},
	Processor,
};
use crate::{data::EventData, errors::RunError, function::Function};

/// How a slice's per-key outputs are merged into its output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SlicePolicy {
	/// Forward every slice output as soon as it is produced
	#[default]
	Interleave,

	/// On every slice output, emit a map from each key (as text)
	/// to the latest output of that key's slice on the same port.
	///
	/// Distinct keys that render to the same text (`1` and `"1"`)
	/// keep separate slices but share one map entry.
	KeyedMap,
}

/// The canonical form of a slice key.
///
/// Whole floats become integers, so `1` and `1.0` select the same slice,
/// and every NaN is the same key.
fn normalize_key(key: EventData) -> EventData {
	match key {
		EventData::Float(x) if x.is_nan() => EventData::Float(f64::NAN),
		EventData::Float(x)
			if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 =>
		{
			EventData::Integer(x as i64)
		}
		x => x,
	}
}

struct Slice {
	key: EventData,
	instance: Box<dyn ProcessorInstance>,
}

pub(super) struct SliceInstance {
	key: Function,
	inner: Processor,
	policy: SlicePolicy,

	/// Slices, in the order they were created
	slices: Vec<Slice>,

	/// Latest output per key, one map per output port.
	/// Only used by [`SlicePolicy::KeyedMap`].
	latest: Vec<BTreeMap<SmartString<LazyCompact>, EventData>>,
}

impl SliceInstance {
	pub fn new(key: Function, inner: Processor, policy: SlicePolicy) -> Self {
		let latest = (0..inner.output_arity()).map(|_| BTreeMap::new()).collect();
		Self {
			key,
			inner,
			policy,
			slices: Vec::new(),
			latest,
		}
	}

	/// Forward the outputs of slice `idx`
	fn forward(&mut self, idx: usize, events: Vec<(usize, EventData)>, out: &mut Outbox) {
		match self.policy {
			SlicePolicy::Interleave => {
				for (port, data) in events {
					out.send(port, data);
				}
			}

			SlicePolicy::KeyedMap => {
				let key: SmartString<LazyCompact> = self.slices[idx].key.to_string().into();
				for (port, data) in events {
					if let Some(latest) = self.latest.get_mut(port) {
						latest.insert(key.clone(), data);
						out.send(port, EventData::map(latest.clone()));
					}
				}
			}
		}
	}

	fn find_or_create(&mut self, key: EventData, out: &mut Outbox) -> Result<usize, RunError> {
		let key = normalize_key(key);
		if let Some(idx) = self
			.slices
			.iter()
			.position(|s| s.key.total_cmp(&key) == Ordering::Equal)
		{
			return Ok(idx);
		}

		debug!(message = "New slice", key = %key, slices = self.slices.len() + 1);
		let mut instance = self.inner.instantiate();
		let mut buf = Outbox::new();
		instance.start(&mut buf)?;
		self.slices.push(Slice { key, instance });

		let idx = self.slices.len() - 1;
		self.forward(idx, buf.take(), out);
		Ok(idx)
	}
}

impl ProcessorInstance for SliceInstance {
	fn push(&mut self, _port: usize, data: EventData, out: &mut Outbox) -> Result<(), RunError> {
		let key = self.key.evaluate_single(std::slice::from_ref(&data))?;
		let idx = self.find_or_create(key, out)?;

		let mut buf = Outbox::new();
		self.slices[idx].instance.push(0, data, &mut buf)?;
		self.forward(idx, buf.take(), out);
		Ok(())
	}

	fn finish(&mut self, out: &mut Outbox) -> Result<(), RunError> {
		for idx in 0..self.slices.len() {
			let mut buf = Outbox::new();
			self.slices[idx].instance.finish(&mut buf)?;
			self.forward(idx, buf.take(), out);
		}
		Ok(())
	}
}
