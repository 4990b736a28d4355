use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One ranked class and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Prediction {
	/// Class name
	pub breed: String,
	/// Softmax probability, rounded to 4 decimal digits
	pub probability: f64,
}

/// The top-ranked predictions for one image, most probable first.
pub type PredictionResult = Vec<Prediction>;
