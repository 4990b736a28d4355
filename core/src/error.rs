use std::path::PathBuf;

use crate::labels::LabelSpaceError;

/// Failure to bring a model up. Always fatal: the service must not serve without a loaded model.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
	#[error("checkpoint not found at {}", .0.display())]
	NotFound(PathBuf),

	#[error("failed to read checkpoint: {0}")]
	Io(#[from] std::io::Error),

	#[error("checkpoint is corrupt: {0}")]
	Corrupt(String),

	#[error("checkpoint has no `{0}` metadata")]
	MissingLabels(&'static str),

	#[error("invalid label space: {0}")]
	Labels(#[from] LabelSpaceError),

	#[error("failed to restore model parameters: {0}")]
	Parameters(#[source] Box<dyn std::error::Error + Send + Sync>),

	#[error("model scores {got} classes but the label space has {expected}")]
	OutputMismatch { expected: usize, got: usize },

	#[error("device {0} is not available")]
	DeviceUnavailable(String),
}
