//! A synchronous reference runner.
//!
//! This pushes events through a processor one at a time on the calling
//! thread. It is meant for tests and small tools: a production runtime
//! drives [`ProcessorInstance`]s itself.

use tracing::{debug, trace};

use crate::{
	data::EventData,
	errors::RunError,
	processor::{Outbox, Processor, ProcessorInstance},
};

/// Run `processor` to completion.
///
/// `inputs[k]` is the stream of events for input port `k`. Streams are
/// interleaved by position: the first event of every stream is pushed
/// (in port order), then the second, and so on.
///
/// Returns one vector of events per output port.
pub fn run(
	processor: &Processor,
	inputs: Vec<Vec<EventData>>,
) -> Result<Vec<Vec<EventData>>, RunError> {
	if inputs.len() != processor.input_arity() {
		return Err(RunError::WrongInputCount {
			expected: processor.input_arity(),
			got: inputs.len(),
		});
	}

	debug!(
		message = "Running processor",
		processor = processor.name(),
		inputs = processor.input_arity(),
		outputs = processor.output_arity(),
	);

	let mut instance = processor.instantiate();
	let mut out = Outbox::new();
	instance.start(&mut out)?;

	let longest = inputs.iter().map(Vec::len).max().unwrap_or(0);
	let mut streams = inputs.into_iter().map(Vec::into_iter).collect::<Vec<_>>();
	for _ in 0..longest {
		for (port, stream) in streams.iter_mut().enumerate() {
			if let Some(data) = stream.next() {
				trace!(message = "Pushing event", port, %data);
				instance.push(port, data, &mut out)?;
			}
		}
	}

	instance.finish(&mut out)?;

	let mut outputs = vec![Vec::new(); processor.output_arity()];
	for (port, data) in out.take() {
		let arity = outputs.len();
		outputs
			.get_mut(port)
			.ok_or(RunError::BadPort { port, arity })?
			.push(data);
	}

	debug!(
		message = "Processor finished",
		processor = processor.name(),
		events = outputs.iter().map(Vec::len).sum::<usize>(),
	);

	return Ok(outputs);
}

/// Run a processor with at most one input and one output.
///
/// `inputs` are pushed on port 0 (if the processor has an input),
/// and the events of output port 0 are returned (if it has an output).
pub fn run_single(
	processor: &Processor,
	inputs: Vec<EventData>,
) -> Result<Vec<EventData>, RunError> {
	let inputs = match processor.input_arity() {
		0 if inputs.is_empty() => vec![],
		0 => {
			return Err(RunError::WrongInputCount {
				expected: 0,
				got: 1,
			})
		}
		_ => vec![inputs],
	};

	let outputs = run(processor, inputs)?;
	Ok(outputs.into_iter().next().unwrap_or_default())
}

/// Run an existing instance, pushing `events` on `port`.
/// Returns everything it emits, including from `start` and `finish`.
pub fn run_instance(
	instance: &mut dyn ProcessorInstance,
	port: usize,
	events: impl IntoIterator<Item = EventData>,
) -> Result<Vec<(usize, EventData)>, RunError> {
	let mut out = Outbox::new();
	instance.start(&mut out)?;
	for data in events {
		instance.push(port, data, &mut out)?;
	}
	instance.finish(&mut out)?;
	Ok(out.take())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operators;

	#[test]
	fn wrong_input_count() {
		let p = Processor::apply_function(operators::plus());
		assert!(matches!(
			run(&p, vec![vec![]]),
			Err(RunError::WrongInputCount {
				expected: 2,
				got: 1
			})
		));
	}

	#[test]
	fn unbalanced_streams() {
		// The second port runs dry, so later events on the first port wait forever
		let p = Processor::apply_function(operators::plus());
		let out = run(&p, vec![vec![1.into(), 2.into(), 3.into()], vec![10.into()]]).unwrap();
		assert_eq!(out, vec![vec![EventData::Integer(11)]]);
	}

	#[test]
	fn instances_are_independent() {
		let p = Processor::cumulate(operators::plus()).unwrap();
		let mut a = p.instantiate();
		let mut b = p.instantiate();

		let out_a = run_instance(a.as_mut(), 0, [1.into(), 2.into()]).unwrap();
		let out_b = run_instance(b.as_mut(), 0, [5.into()]).unwrap();
		assert_eq!(
			out_a,
			vec![(0, EventData::Integer(1)), (0, EventData::Integer(3))]
		);
		assert_eq!(out_b, vec![(0, EventData::Integer(5))]);
	}
}
