use std::path::Path;

use anyhow::{Context, Result};
use breed_core::{Classifier, ImageTensor, LabelSpace, ModelLoadError};
use tch::{
	nn::{FuncT, ModuleT, VarStore},
	vision::resnet::resnet50,
	Device, Kind, Tensor,
};

use crate::checkpoint;

/// A ResNet-50 with restored, frozen weights, always evaluated in inference mode.
pub struct ResNetClassifier {
	model: FuncT<'static>,
	device: Device,
	num_classes: usize,
	// Owns the parameters the model closure reads from.
	_vs: VarStore,
}

/// Build a ResNet-50 sized to the checkpoint's label space and restore its weights.
///
/// # Errors
///
/// Returns an error if the checkpoint cannot be read, its labels are invalid, or its parameters do not fit the architecture.
pub fn load(
	path: impl AsRef<Path>,
	device: Device,
) -> Result<(ResNetClassifier, LabelSpace), ModelLoadError> {
	let path = path.as_ref();
	let labels = checkpoint::read_labels(path)?;
	tracing::debug!("Checkpoint declares {} classes: {:?}", labels.len(), labels.names());

	let num_classes = i64::try_from(labels.len())
		.map_err(|_| ModelLoadError::Corrupt(format!("{} classes is too many", labels.len())))?;

	let mut vs = VarStore::new(device);
	let model = resnet50(&vs.root(), num_classes);
	vs.load(path)
		.map_err(|e| ModelLoadError::Parameters(Box::new(e)))?;
	vs.freeze();

	tracing::info!(
		"Loaded ResNet-50 with {} classes from {} on {device:?}",
		labels.len(),
		path.display()
	);

	Ok((
		ResNetClassifier {
			model,
			device,
			num_classes: labels.len(),
			_vs: vs,
		},
		labels,
	))
}

impl Classifier for ResNetClassifier {
	fn num_classes(&self) -> usize {
		self.num_classes
	}

	fn forward(&self, input: &ImageTensor) -> Result<Vec<f32>> {
		let input = input.as_standard_layout();
		let data = input.as_slice().context("input tensor is not contiguous")?;
		let shape = input
			.shape()
			.iter()
			.map(|&dim| i64::try_from(dim))
			.collect::<Result<Vec<_>, _>>()?;

		let scores = tch::no_grad(|| -> Result<Tensor> {
			let input = Tensor::f_from_slice(data)?
				.f_view(shape.as_slice())?
				.to_device(self.device);

			Ok(self.model.forward_t(&input, false))
		})?;

		let scores = scores.to_kind(Kind::Float).to_device(Device::Cpu).f_view([-1])?;
		Ok(Vec::<f32>::try_from(&scores)?)
	}
}
