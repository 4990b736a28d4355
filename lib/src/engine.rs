use breed_core::{
	Classifier, ImageTensor, LabelSpace, ModelLoadError, Prediction, PredictionResult, TOP_K,
};

use crate::errors::PredictError;

/// A loaded classifier bound to the label space its outputs are indexed by.
///
/// Built once at startup and never mutated afterwards; every request goes through [`InferenceEngine::predict`].
pub struct InferenceEngine<C> {
	classifier: C,
	labels: LabelSpace,
}

impl<C: Classifier> InferenceEngine<C> {
	/// Bind a classifier to its label space.
	///
	/// # Errors
	///
	/// Returns [`ModelLoadError::OutputMismatch`] if the classifier scores a different number of classes than there are labels.
	pub fn new(classifier: C, labels: LabelSpace) -> Result<Self, ModelLoadError> {
		if classifier.num_classes() != labels.len() {
			return Err(ModelLoadError::OutputMismatch {
				expected: labels.len(),
				got: classifier.num_classes(),
			});
		}

		Ok(Self { classifier, labels })
	}

	/// The full softmax distribution over every class, indexed like the label space.
	///
	/// # Errors
	///
	/// Returns [`PredictError::Inference`] if the input has the wrong shape, the forward pass fails,
	/// or the model returns the wrong number of scores or a non-finite score.
	pub fn distribution(&self, tensor: &ImageTensor) -> Result<Vec<f32>, PredictError> {
		let shape = tensor.shape();
		if shape[0] != 1 || shape[1] != 3 || shape[2] == 0 || shape[3] == 0 {
			return Err(PredictError::inference(format!(
				"expected an input of shape [1, 3, H, W], got {shape:?}"
			)));
		}

		let scores = self
			.classifier
			.forward(tensor)
			.map_err(PredictError::Inference)?;

		if scores.len() != self.labels.len() {
			return Err(PredictError::inference(format!(
				"model returned {} scores for {} classes",
				scores.len(),
				self.labels.len()
			)));
		}

		softmax(&scores).ok_or_else(|| PredictError::inference("model returned non-finite scores"))
	}

	/// Rank the [`TOP_K`] most probable classes for a preprocessed image.
	///
	/// # Errors
	///
	/// See [`InferenceEngine::distribution`].
	pub fn predict(&self, tensor: &ImageTensor) -> Result<PredictionResult, PredictError> {
		let probabilities = self.distribution(tensor)?;

		top_k(&probabilities, TOP_K)
			.into_iter()
			.map(|index| {
				let breed = self.labels.get(index).ok_or_else(|| {
					PredictError::inference(format!("class index {index} has no label"))
				})?;

				Ok(Prediction {
					breed: breed.to_string(),
					probability: round_probability(probabilities[index]),
				})
			})
			.collect()
	}
}

/// Max-subtracted softmax. Returns `None` if any score is NaN or infinite.
#[must_use]
pub fn softmax(scores: &[f32]) -> Option<Vec<f32>> {
	if scores.iter().any(|score| !score.is_finite()) {
		return None;
	}

	let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let exps = scores
		.iter()
		.map(|score| (score - max).exp())
		.collect::<Vec<_>>();
	let sum: f32 = exps.iter().sum();

	Some(exps.into_iter().map(|value| value / sum).collect())
}

/// Indices of the `k` largest values, largest first. Equal values keep ascending index order.
#[must_use]
pub fn top_k(values: &[f32], k: usize) -> Vec<usize> {
	let mut indices = (0..values.len()).collect::<Vec<_>>();
	indices.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
	indices.truncate(k);

	indices
}

/// Round to 4 decimal digits for presentation.
#[must_use]
pub fn round_probability(probability: f32) -> f64 {
	(f64::from(probability) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{labels, FailingClassifier, StubClassifier};
	use ndarray::Array4;

	fn input() -> ImageTensor {
		Array4::zeros((1, 3, 8, 8))
	}

	fn engine(scores: Vec<f32>, names: &[&str]) -> InferenceEngine<StubClassifier> {
		InferenceEngine::new(StubClassifier::new(scores), labels(names)).unwrap()
	}

	#[test]
	fn softmax_sums_to_one() {
		for scores in [
			vec![1.0, 2.0, 3.0],
			vec![-40.0, 0.0, 12.5, 7.25, 3.0],
			vec![1000.0, 999.0, -1000.0],
			vec![0.0; 120],
		] {
			let probabilities = softmax(&scores).unwrap();
			let total: f32 = probabilities.iter().sum();

			assert_eq!(probabilities.len(), scores.len());
			assert!((total - 1.0).abs() < 1e-5, "{scores:?} summed to {total}");
			assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
		}
	}

	#[test]
	fn softmax_rejects_non_finite_scores() {
		assert_eq!(softmax(&[1.0, f32::NAN, 0.0]), None);
		assert_eq!(softmax(&[f32::INFINITY, 0.0, 0.0]), None);
	}

	#[test]
	fn top_k_ranks_descending() {
		assert_eq!(top_k(&[0.1, 0.5, 0.05, 0.3, 0.05], 3), vec![1, 3, 0]);
	}

	#[test]
	fn top_k_breaks_ties_by_lowest_index() {
		assert_eq!(top_k(&[0.25, 0.25, 0.25, 0.25], 3), vec![0, 1, 2]);
		assert_eq!(top_k(&[0.0, 0.2, 0.3, 0.2, 0.3], 3), vec![2, 4, 1]);
	}

	#[test]
	fn rounds_to_four_digits() {
		assert!((round_probability(0.643_914_3) - 0.6439).abs() < f64::EPSILON);
		assert!((round_probability(0.000_04) - 0.0).abs() < f64::EPSILON);
		assert!((round_probability(1.0) - 1.0).abs() < f64::EPSILON);
	}

	#[test]
	fn predicts_top_three_with_exact_probabilities() {
		let engine = engine(vec![1.0, 3.0, 0.0, 2.0], &["beagle", "husky", "pug", "collie"]);
		let result = engine.predict(&input()).unwrap();

		assert_eq!(
			result,
			vec![
				Prediction {
					breed: "husky".to_string(),
					probability: 0.6439,
				},
				Prediction {
					breed: "collie".to_string(),
					probability: 0.2369,
				},
				Prediction {
					breed: "beagle".to_string(),
					probability: 0.0871,
				},
			]
		);
	}

	#[test]
	fn equal_scores_rank_by_label_order() {
		let engine = engine(vec![0.5, 2.0, 2.0, 2.0], &["a", "b", "c", "d"]);
		let breeds = engine
			.predict(&input())
			.unwrap()
			.into_iter()
			.map(|prediction| prediction.breed)
			.collect::<Vec<_>>();

		assert_eq!(breeds, vec!["b", "c", "d"]);
	}

	#[test]
	fn full_distribution_covers_every_label() {
		let engine = engine(vec![0.3, -1.2, 4.0, 0.0, 2.2], &["a", "b", "c", "d", "e"]);
		let distribution = engine.distribution(&input()).unwrap();
		let total: f32 = distribution.iter().sum();

		assert_eq!(distribution.len(), 5);
		assert!((total - 1.0).abs() < 1e-5);
	}

	#[test]
	fn prediction_is_idempotent() {
		let engine = engine(vec![0.3, -1.2, 4.0, 0.0, 2.2], &["a", "b", "c", "d", "e"]);
		let tensor = input();

		assert_eq!(
			engine.predict(&tensor).unwrap(),
			engine.predict(&tensor).unwrap()
		);
	}

	#[test]
	fn results_are_sorted_and_bounded() {
		let engine = engine(
			vec![0.9, 0.1, 0.4, 2.5, -3.0, 1.7, 1.7],
			&["a", "b", "c", "d", "e", "f", "g"],
		);
		let result = engine.predict(&input()).unwrap();

		assert_eq!(result.len(), TOP_K);
		assert!(result.iter().all(|p| (0.0..=1.0).contains(&p.probability)));
		assert!(result
			.windows(2)
			.all(|pair| pair[0].probability >= pair[1].probability));
	}

	#[test]
	fn rejects_mismatched_label_space() {
		let result = InferenceEngine::new(
			StubClassifier::new(vec![0.0; 4]),
			labels(&["a", "b", "c"]),
		);

		assert!(matches!(
			result,
			Err(ModelLoadError::OutputMismatch {
				expected: 3,
				got: 4
			})
		));
	}

	#[test]
	fn rejects_wrong_input_shape() {
		let engine = engine(vec![0.0; 3], &["a", "b", "c"]);

		for tensor in [Array4::zeros((2, 3, 8, 8)), Array4::zeros((1, 1, 8, 8))] {
			assert!(matches!(
				engine.predict(&tensor),
				Err(PredictError::Inference(_))
			));
		}
	}

	#[test]
	fn rejects_score_vectors_of_the_wrong_length() {
		let mut stub = StubClassifier::new(vec![0.0; 3]);
		let engine = {
			let engine = InferenceEngine::new(stub.clone(), labels(&["a", "b", "c"])).unwrap();
			stub.scores.push(1.0);
			InferenceEngine { classifier: stub, ..engine }
		};

		assert!(matches!(
			engine.predict(&input()),
			Err(PredictError::Inference(_))
		));
	}

	#[test]
	fn forward_failures_surface_as_inference_errors() {
		let engine = InferenceEngine::new(FailingClassifier, labels(&["a", "b", "c"])).unwrap();

		let error = engine.predict(&input()).unwrap_err();
		assert!(matches!(error, PredictError::Inference(_)));
		assert!(error.to_string().contains("out of memory"));
	}

	#[test]
	fn non_finite_scores_are_inference_errors() {
		let engine = engine(vec![0.0, f32::NAN, 1.0], &["a", "b", "c"]);

		assert!(matches!(
			engine.predict(&input()),
			Err(PredictError::Inference(_))
		));
	}
}
