//! Log filter presets.
//!
//! Binaries pick a [`LoggingPreset`] from their config
//! and hand the resulting filter to `tracing_subscriber`.

use serde::Deserialize;
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl Default for LogLevel {
	fn default() -> Self {
		Self::Info
	}
}

impl Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Trace => write!(f, "trace"),
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warn => write!(f, "warn"),
			Self::Error => write!(f, "error"),
		}
	}
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LoggingPreset {
	Default,
	Verbose,
	Develop,
	Trace,
}

impl Default for LoggingPreset {
	fn default() -> Self {
		return Self::Default;
	}
}

impl LoggingPreset {
	pub fn get_config(&self) -> LoggingConfig {
		match self {
			Self::Default => LoggingConfig {
				other: LogLevel::Warn,
				cli: LogLevel::Info,
				group: LogLevel::Warn,
				runner: LogLevel::Warn,
				spec: LogLevel::Info,
			},

			Self::Verbose => LoggingConfig {
				other: LogLevel::Warn,
				cli: LogLevel::Debug,
				group: LogLevel::Info,
				runner: LogLevel::Info,
				spec: LogLevel::Debug,
			},

			Self::Develop => LoggingConfig {
				other: LogLevel::Debug,
				cli: LogLevel::Trace,
				group: LogLevel::Debug,
				runner: LogLevel::Debug,
				spec: LogLevel::Trace,
			},

			Self::Trace => LoggingConfig {
				other: LogLevel::Trace,
				cli: LogLevel::Trace,
				group: LogLevel::Trace,
				runner: LogLevel::Trace,
				spec: LogLevel::Trace,
			},
		}
	}
}

pub struct LoggingConfig {
	other: LogLevel,
	cli: LogLevel,

	group: LogLevel,
	runner: LogLevel,
	spec: LogLevel,
}

impl LoggingConfig {
	/// The `EnvFilter` directive string for this config
	pub fn directives(&self) -> String {
		[
			format!("brook={}", self.cli),
			format!("brook_pipeline::group={}", self.group),
			format!("brook_pipeline::runner={}", self.runner),
			format!("brook_pipeline::spec={}", self.spec),
			self.other.to_string(),
		]
		.join(",")
	}
}

impl From<LoggingConfig> for EnvFilter {
	fn from(value: LoggingConfig) -> Self {
		EnvFilter::try_new(value.directives()).unwrap_or_else(|_err| EnvFilter::new("warn"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn presets_build_filters() {
		for preset in [
			LoggingPreset::Default,
			LoggingPreset::Verbose,
			LoggingPreset::Develop,
			LoggingPreset::Trace,
		] {
			let directives = preset.get_config().directives();
			assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
		}
	}

	#[test]
	fn default_preset_is_quiet() {
		let d = LoggingPreset::default().get_config().directives();
		assert!(d.contains("brook_pipeline::runner=warn"));
		assert!(d.ends_with("warn"));
	}
}
