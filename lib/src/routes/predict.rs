use aide::axum::{routing::post, ApiRouter};
use axum::{body::Bytes, extract::Multipart, http::StatusCode, Extension};
use axum_jsonschema::Json;
use breed_core::http::PredictResponse;

use crate::{
	errors::{HTTPError, PredictError},
	preprocess::ensure_image,
	runner::Runner,
};

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.api_route("/predict/", post(predict))
		.api_route("/predict", post(predict))
}

struct Upload {
	bytes: Bytes,
	filename: Option<String>,
	content_type: Option<String>,
}

/// Pull the `file` field out of a multipart body, skipping any other fields.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, HTTPError> {
	while let Some(field) = multipart.next_field().await? {
		if field.name() != Some("file") {
			continue;
		}

		let filename = field.file_name().map(ToString::to_string);
		let content_type = field.content_type().map(ToString::to_string);

		return Ok(Upload {
			filename,
			content_type,
			bytes: field.bytes().await?,
		});
	}

	Err(HTTPError::new("No file uploaded").with_status(StatusCode::BAD_REQUEST))
}

async fn predict(
	Extension(runner): Extension<Runner>,
	mut multipart: Multipart,
) -> Result<Json<PredictResponse>, HTTPError> {
	let upload = read_upload(&mut multipart).await?;
	tracing::debug!(
		"Received file: {:?}, content_type: {:?}",
		upload.filename,
		upload.content_type
	);

	if let Err(e) = ensure_image(upload.content_type.as_deref()) {
		tracing::debug!("Rejecting upload: {e}");
		return Err(e.into());
	}

	let predictions = runner.classify(upload.bytes).await.map_err(|e| {
		if let PredictError::Inference(error) = &e {
			tracing::error!("Error processing image {:?}: {error:?}", upload.filename);
		} else {
			tracing::warn!("Could not process image {:?}: {e}", upload.filename);
		}

		e
	})?;

	Ok(Json(PredictResponse {
		predictions,
		filename: upload.filename,
	}))
}
