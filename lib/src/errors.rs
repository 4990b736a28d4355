use aide::OperationOutput;
use axum::{
	extract::multipart::MultipartError,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use breed_core::http::ErrorResponse;

/// A recoverable failure while classifying a single upload.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
	#[error("File must be an image, got content type {0:?}")]
	UnsupportedInput(String),

	#[error("failed to decode image: {0}")]
	Decode(#[from] image::ImageError),

	#[error("inference failed: {0:#}")]
	Inference(anyhow::Error),
}

impl PredictError {
	pub(crate) fn inference(message: impl Into<String>) -> Self {
		Self::Inference(anyhow::Error::msg(message.into()))
	}

	#[must_use]
	pub const fn status_code(&self) -> StatusCode {
		match self {
			Self::UnsupportedInput(_) => StatusCode::BAD_REQUEST,
			Self::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
			Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

#[derive(Debug)]
pub struct HTTPError {
	detail: String,
	status_code: StatusCode,
}

impl HTTPError {
	pub fn new(detail: &str) -> Self {
		Self {
			detail: detail.to_string(),
			status_code: StatusCode::UNPROCESSABLE_ENTITY,
		}
	}

	pub const fn with_status(mut self, status_code: StatusCode) -> Self {
		self.status_code = status_code;
		self
	}
}

impl IntoResponse for HTTPError {
	fn into_response(self) -> Response {
		(
			self.status_code,
			Json(ErrorResponse {
				detail: self.detail,
			}),
		)
			.into_response()
	}
}

impl OperationOutput for HTTPError {
	type Inner = Self;
}

impl From<PredictError> for HTTPError {
	fn from(e: PredictError) -> Self {
		let detail = match &e {
			PredictError::UnsupportedInput(_) => "File must be an image".to_string(),
			PredictError::Decode(_) | PredictError::Inference(_) => {
				format!("Error processing image: {e}")
			},
		};

		Self {
			detail,
			status_code: e.status_code(),
		}
	}
}

impl From<MultipartError> for HTTPError {
	fn from(e: MultipartError) -> Self {
		let status_code = e.status();
		if status_code == StatusCode::PAYLOAD_TOO_LARGE {
			return Self::new("Uploaded file is too large").with_status(status_code);
		}

		Self::new(&format!("Invalid multipart upload: {}", e.body_text())).with_status(status_code)
	}
}
