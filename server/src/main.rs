#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use breed_classifier::{InferenceEngine, Runner, ServerConfig};
use clap::Parser;
use device::DeviceChoice;
use tracing_subscriber::EnvFilter;

mod checkpoint;
mod device;
mod loader;

/// Serve dog breed predictions from a ResNet-50 checkpoint
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// safetensors checkpoint carrying the weights and a `class_names` metadata entry
	#[arg(
		long,
		env = "CHECKPOINT_PATH",
		default_value = "weights/resnet50_dog_breed_classifier.safetensors"
	)]
	checkpoint: PathBuf,

	/// Device to run the model on
	#[arg(long, env = "DEVICE", value_enum, default_value_t = DeviceChoice::Auto)]
	device: DeviceChoice,

	/// Log filter used when RUST_LOG is unset
	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	log_level: String,

	/// Print the OpenAPI document and exit without loading the model
	#[arg(long)]
	dump_schema_and_exit: bool,

	#[command(flatten)]
	server: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	init_tracing(&cli.log_level);

	if cli.dump_schema_and_exit {
		println!(
			"{}",
			serde_json::to_string(&breed_classifier::server::openapi())?
		);
		return Ok(());
	}

	let device = cli.device.resolve()?;
	let (model, labels) = loader::load(&cli.checkpoint, device)
		.map_err(|e| {
			tracing::error!("Failed to load model: {e}");
			e
		})
		.with_context(|| format!("failed to load {}", cli.checkpoint.display()))?;

	let engine = InferenceEngine::new(model, labels)?;
	let runner = Runner::new(engine, cli.server.preprocessor(), cli.server.queue_size)
		.context("failed to start the inference worker")?;

	breed_classifier::start(&cli.server, runner).await
}

fn init_tracing(default_filter: &str) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_shipped_weights() {
		let cli = Cli::try_parse_from(["breed-server"]).unwrap();

		assert_eq!(
			cli.checkpoint,
			PathBuf::from("weights/resnet50_dog_breed_classifier.safetensors")
		);
		assert_eq!(cli.device, DeviceChoice::Auto);
		assert!(!cli.dump_schema_and_exit);
	}

	#[test]
	fn device_is_selectable() {
		let cli = Cli::try_parse_from(["breed-server", "--device", "cpu"]).unwrap();

		assert_eq!(cli.device, DeviceChoice::Cpu);
	}

	#[test]
	fn unknown_devices_are_rejected() {
		assert!(Cli::try_parse_from(["breed-server", "--device", "tpu"]).is_err());
	}
}
