use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::preprocess::{Preprocessor, DEFAULT_IMAGE_SIZE};

/// Largest request body accepted on upload routes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// HTTP and pipeline settings, read from flags or the environment.
#[derive(Debug, Clone, clap::Args)]
pub struct ServerConfig {
	/// Address to listen on
	#[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
	pub host: IpAddr,

	/// Port to listen on
	#[arg(long, env = "PORT", default_value_t = 5000)]
	pub port: u16,

	/// Side length images are resized to before inference
	#[arg(long, env = "IMAGE_SIZE", default_value_t = DEFAULT_IMAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
	pub image_size: u32,

	/// Maximum number of preprocessed images waiting for the model
	#[arg(long, env = "QUEUE_SIZE", default_value_t = 64)]
	pub queue_size: usize,

	/// Largest accepted upload, in bytes
	#[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
	pub max_upload_bytes: usize,
}

impl ServerConfig {
	#[must_use]
	pub const fn addr(&self) -> SocketAddr {
		SocketAddr::new(self.host, self.port)
	}

	#[must_use]
	pub const fn preprocessor(&self) -> Preprocessor {
		Preprocessor::new(self.image_size)
	}
}
