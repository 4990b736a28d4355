use anyhow::Result;
use ndarray::Array4;

/// A preprocessed image batch of shape `[1, 3, height, width]`, channels in RGB order.
pub type ImageTensor = Array4<f32>;

/// A model that scores an image against a fixed set of classes.
///
/// Implementations must be read-only during [`Classifier::forward`]: the same
/// instance serves every request for the lifetime of the process.
pub trait Classifier: Send {
	/// Number of scores [`Classifier::forward`] returns, one per class.
	fn num_classes(&self) -> usize;

	/// Run a single forward pass and return the raw (pre-softmax) scores.
	///
	/// # Errors
	///
	/// Returns an error if the model cannot evaluate the input.
	fn forward(&self, input: &ImageTensor) -> Result<Vec<f32>>;
}
