#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub use breed_core::{
	Classifier, ImageTensor, LabelSpace, LabelSpaceError, ModelLoadError, Prediction,
	PredictionResult, TOP_K,
};
pub use config::ServerConfig;
pub use engine::InferenceEngine;
pub use errors::PredictError;
pub use preprocess::Preprocessor;
pub use runner::{Health, Runner};
pub use server::start;

pub mod config;
pub mod engine;
mod errors;
pub mod preprocess;
mod routes;
pub mod runner;
pub mod server;
mod shutdown;

#[cfg(test)]
mod testing;
