use std::io::Cursor;

use anyhow::{bail, Result};
use breed_core::{Classifier, ImageTensor, LabelSpace};
use image::{DynamicImage, ImageOutputFormat};

/// Returns the same scores for every input.
#[derive(Debug, Clone)]
pub struct StubClassifier {
	pub scores: Vec<f32>,
}

impl StubClassifier {
	pub fn new(scores: Vec<f32>) -> Self {
		Self { scores }
	}
}

impl Classifier for StubClassifier {
	fn num_classes(&self) -> usize {
		self.scores.len()
	}

	fn forward(&self, _: &ImageTensor) -> Result<Vec<f32>> {
		Ok(self.scores.clone())
	}
}

pub struct FailingClassifier;

impl Classifier for FailingClassifier {
	fn num_classes(&self) -> usize {
		3
	}

	fn forward(&self, _: &ImageTensor) -> Result<Vec<f32>> {
		bail!("out of memory")
	}
}

pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
	fn num_classes(&self) -> usize {
		3
	}

	fn forward(&self, _: &ImageTensor) -> Result<Vec<f32>> {
		panic!("kernel exploded")
	}
}

pub fn labels(names: &[&str]) -> LabelSpace {
	LabelSpace::new(names.iter().map(ToString::to_string).collect()).unwrap()
}

pub fn encode(image: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
	let mut bytes = Cursor::new(Vec::new());
	image.write_to(&mut bytes, format).unwrap();

	bytes.into_inner()
}

pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
	encode(image, ImageOutputFormat::Png)
}

pub fn encode_jpeg(image: &DynamicImage) -> Vec<u8> {
	encode(image, ImageOutputFormat::Jpeg(90))
}
