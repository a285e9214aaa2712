use anyhow::{bail, Context, Result};
use brook_pipeline::{
	data::EventData,
	processor::Processor,
	runner::run,
	spec::PipelineSpec,
};
use brook_util::{load_env, LoadedEnv};
use clap::{Parser, Subcommand};
use config::BrookConfig;
use std::{
	io::BufRead,
	path::{Path, PathBuf},
};
use tracing::{debug, info};

mod config;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Build a pipeline spec and report its shape
	Check { spec: PathBuf },

	/// Run a pipeline spec.
	/// Each line of stdin is sent to input 0 as a text event.
	Run { spec: PathBuf },
}

fn main() -> Result<()> {
	let cli = Args::parse();

	let config_res = match load_env::<BrookConfig>() {
		Ok(x) => x,

		#[expect(clippy::print_stderr)]
		Err(err) => {
			eprintln!("Error while loading .env: {err}");
			std::process::exit(1);
		}
	};

	tracing_subscriber::fmt()
		.with_env_filter(config_res.get_config().brook_loglevel.get_config())
		.without_time()
		.with_writer(std::io::stderr)
		.with_ansi(true)
		.init();

	// Do this now, logging wasn't available earlier
	match config_res {
		LoadedEnv::FoundFile { config, path } => {
			debug!(message = "Loaded config from .env", ?path, ?config);
		}
		LoadedEnv::OnlyVars(config) => {
			debug!(
				message = "No `.env` found, loaded config from environment",
				?config
			);
		}
	};

	match cli.command {
		Commands::Check { spec } => {
			let processor = load(&spec)?;
			report_shape(&spec, &processor);
		}

		Commands::Run { spec } => {
			let processor = load(&spec)?;

			let inputs = match processor.input_arity() {
				0 => vec![],
				1 => {
					let lines = std::io::stdin()
						.lock()
						.lines()
						.map(|l| l.map(EventData::from))
						.collect::<Result<Vec<_>, _>>()
						.context("could not read stdin")?;
					debug!(message = "Read input", events = lines.len());
					vec![lines]
				}
				n => bail!(
					"`{}` has {n} inputs, but only pipelines with at most one input can read stdin",
					spec.display()
				),
			};

			let outputs = run(&processor, inputs)
				.with_context(|| format!("could not run `{}`", spec.display()))?;
			print_outputs(&outputs);
		}
	}

	Ok(())
}

fn load(path: &Path) -> Result<Processor> {
	let spec = PipelineSpec::from_file(path)?;
	let processor = spec
		.build()
		.with_context(|| format!("could not build `{}`", path.display()))?;

	info!(
		message = "Built pipeline",
		path = %path.display(),
		inputs = processor.input_arity(),
		outputs = processor.output_arity()
	);

	Ok(processor)
}

#[expect(clippy::print_stdout)]
fn report_shape(path: &Path, processor: &Processor) {
	println!(
		"{}: ok ({} input(s), {} output(s))",
		path.display(),
		processor.input_arity(),
		processor.output_arity()
	);
}

#[expect(clippy::print_stdout)]
fn print_outputs(outputs: &[Vec<EventData>]) {
	// Only label lines when there is more than one output
	if let [events] = outputs {
		for e in events {
			println!("{e}");
		}
		return;
	}

	for (port, events) in outputs.iter().enumerate() {
		for e in events {
			println!("{port}: {e}");
		}
	}
}
