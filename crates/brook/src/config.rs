use brook_util::logging::LoggingPreset;
use serde::Deserialize;

/// Note that the field of this struct are not capitalized.
/// Envy is case-insensitive, and expects Rust fields to be snake_case.
#[derive(Debug, Deserialize, Clone)]
pub struct BrookConfig {
	/// The logging level to run with
	#[serde(default)]
	pub brook_loglevel: LoggingPreset,
}
