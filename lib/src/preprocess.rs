use breed_core::ImageTensor;
use image::{imageops::FilterType, DynamicImage};
use mime_guess::mime::{self, Mime};
use ndarray::Array4;

use crate::errors::PredictError;

/// Side length, in pixels, images are resized to before inference.
pub const DEFAULT_IMAGE_SIZE: u32 = 160;

/// Reject uploads whose declared content type is not an image.
///
/// # Errors
///
/// Returns [`PredictError::UnsupportedInput`] if the content type is missing, unparsable, or outside `image/*`.
pub fn ensure_image(content_type: Option<&str>) -> Result<(), PredictError> {
	let declared = content_type.unwrap_or_default();

	match declared.parse::<Mime>() {
		Ok(mime) if mime.type_() == mime::IMAGE => Ok(()),
		_ => Err(PredictError::UnsupportedInput(declared.to_string())),
	}
}

/// Turns encoded image bytes into the `[1, 3, size, size]` tensor the model expects.
///
/// Pixels are scaled to `[0, 1]` and no mean/std normalization is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
	size: u32,
}

impl Default for Preprocessor {
	fn default() -> Self {
		Self::new(DEFAULT_IMAGE_SIZE)
	}
}

impl Preprocessor {
	#[must_use]
	pub const fn new(size: u32) -> Self {
		Self { size }
	}

	/// Decode and transform raw image bytes.
	///
	/// # Errors
	///
	/// Returns [`PredictError::Decode`] if the bytes are not an image in a supported format.
	pub fn preprocess(&self, bytes: &[u8]) -> Result<ImageTensor, PredictError> {
		let image = image::load_from_memory(bytes)?;

		Ok(self.to_tensor(&image))
	}

	/// Convert to RGB, force both sides to `size` with bilinear resampling and lay the pixels out channel-major.
	#[must_use]
	pub fn to_tensor(&self, image: &DynamicImage) -> ImageTensor {
		let rgb = image.to_rgb8();
		let resized = image::imageops::resize(&rgb, self.size, self.size, FilterType::Triangle);

		let side = self.size as usize;
		let mut tensor = Array4::zeros((1, 3, side, side));
		for (x, y, pixel) in resized.enumerate_pixels() {
			for (channel, value) in pixel.0.iter().enumerate() {
				tensor[[0, channel, y as usize, x as usize]] = f32::from(*value) / 255.0;
			}
		}

		tensor
	}
}
