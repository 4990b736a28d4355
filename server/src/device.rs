use breed_core::ModelLoadError;
use tch::{Cuda, Device};

/// Which compute device to bind the model to for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeviceChoice {
	/// CUDA if an accelerator is present, otherwise CPU
	Auto,
	Cpu,
	Cuda,
}

impl DeviceChoice {
	/// # Errors
	///
	/// Returns [`ModelLoadError::DeviceUnavailable`] if CUDA was requested but no accelerator is present.
	pub fn resolve(self) -> Result<Device, ModelLoadError> {
		match self {
			Self::Auto => Ok(Device::cuda_if_available()),
			Self::Cpu => Ok(Device::Cpu),
			Self::Cuda if Cuda::is_available() => Ok(Device::Cuda(0)),
			Self::Cuda => Err(ModelLoadError::DeviceUnavailable("cuda".to_string())),
		}
	}
}
