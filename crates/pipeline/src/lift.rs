//! Coerce call-site arguments into functions and processors

use smartstring::{LazyCompact, SmartString};

use crate::{
	data::EventData,
	function::{constant, Function},
	processor::Processor,
};

/// Anything that may be used where a [`Function`] is expected
#[derive(Debug, Clone)]
pub enum FunctionArg {
	Function(Function),
	Value(EventData),
}

/// Anything that may be used where a [`Processor`] is expected
#[derive(Debug, Clone)]
pub enum ProcessorArg {
	Processor(Processor),
	Function(Function),
	Value(EventData),
}

/// Turn `arg` into a function.
///
/// Functions are returned as-is (the same node, not a copy).
/// Values become a zero-arity constant.
pub fn lift_function(arg: impl Into<FunctionArg>) -> Function {
	match arg.into() {
		FunctionArg::Function(f) => f,
		FunctionArg::Value(v) => constant(v),
	}
}

/// Turn `arg` into a processor.
///
/// Processors are returned as-is. Functions and values are
/// wrapped in an `ApplyFunction` processor.
pub fn lift_processor(arg: impl Into<ProcessorArg>) -> Processor {
	match arg.into() {
		ProcessorArg::Processor(p) => p,
		ProcessorArg::Function(f) => Processor::apply_function(f),
		ProcessorArg::Value(v) => Processor::apply_function(lift_function(v)),
	}
}

//
// MARK: Conversions
//

impl From<Function> for FunctionArg {
	fn from(value: Function) -> Self {
		Self::Function(value)
	}
}

impl From<&Function> for FunctionArg {
	fn from(value: &Function) -> Self {
		Self::Function(value.clone())
	}
}

impl From<Processor> for ProcessorArg {
	fn from(value: Processor) -> Self {
		Self::Processor(value)
	}
}

impl From<&Processor> for ProcessorArg {
	fn from(value: &Processor) -> Self {
		Self::Processor(value.clone())
	}
}

impl From<Function> for ProcessorArg {
	fn from(value: Function) -> Self {
		Self::Function(value)
	}
}

impl From<&Function> for ProcessorArg {
	fn from(value: &Function) -> Self {
		Self::Function(value.clone())
	}
}

impl From<FunctionArg> for ProcessorArg {
	fn from(value: FunctionArg) -> Self {
		match value {
			FunctionArg::Function(f) => Self::Function(f),
			FunctionArg::Value(v) => Self::Value(v),
		}
	}
}

macro_rules! value_arg {
	($($t:ty),*) => {
		$(
			impl From<$t> for FunctionArg {
				fn from(value: $t) -> Self {
					Self::Value(value.into())
				}
			}

			impl From<$t> for ProcessorArg {
				fn from(value: $t) -> Self {
					Self::Value(value.into())
				}
			}
		)*
	};
}

value_arg!(
	EventData,
	bool,
	i64,
	i32,
	f64,
	&str,
	String,
	SmartString<LazyCompact>,
	Vec<EventData>
);
