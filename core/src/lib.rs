#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod classifier;
pub mod error;
pub mod http;
pub mod labels;
pub mod prediction;

pub use classifier::{Classifier, ImageTensor};
pub use error::ModelLoadError;
pub use labels::{LabelSpace, LabelSpaceError, TOP_K};
pub use prediction::{Prediction, PredictionResult};
