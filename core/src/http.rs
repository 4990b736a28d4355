use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::prediction::PredictionResult;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PredictResponse {
	/// Top 3 classes, most probable first
	pub predictions: PredictionResult,
	/// Name of the uploaded file, if the client sent one
	pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RootResponse {
	/// Static liveness acknowledgement
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
	/// Human-readable failure reason
	pub detail: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Prediction;
	use serde_json::json;

	#[test]
	fn predict_response_wire_format() {
		let response = PredictResponse {
			predictions: vec![Prediction {
				breed: "beagle".to_string(),
				probability: 0.8123,
			}],
			filename: Some("dog.jpg".to_string()),
		};

		assert_eq!(
			serde_json::to_value(response).unwrap(),
			json!({
				"predictions": [{ "breed": "beagle", "probability": 0.8123 }],
				"filename": "dog.jpg",
			})
		);
	}
}
