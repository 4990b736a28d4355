use std::{
	panic::{self, AssertUnwindSafe},
	sync::{atomic::Ordering, Arc},
	thread,
	time::Instant,
};

use atomic_enum::atomic_enum;
use breed_core::{Classifier, ImageTensor, PredictionResult};
use schemars::JsonSchema;
use tokio::sync::{mpsc, oneshot};

use crate::{engine::InferenceEngine, errors::PredictError, preprocess::Preprocessor};

#[atomic_enum]
#[derive(serde::Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Health {
	Starting,
	Ready,
	Busy,
	Stopped,
}

type ResponseSender = oneshot::Sender<Result<PredictionResult, PredictError>>;

/// Handle to the inference worker.
///
/// Decoding runs on tokio's blocking pool, so uploads are preprocessed in parallel. The forward pass runs on a
/// dedicated thread that owns the [`InferenceEngine`]; requests queue on a bounded channel in front of it.
#[derive(Clone)]
pub struct Runner {
	preprocessor: Preprocessor,
	health: Arc<AtomicHealth>,
	sender: mpsc::Sender<(ImageTensor, ResponseSender)>,
}

impl Runner {
	/// Move the engine onto its worker thread.
	///
	/// # Errors
	///
	/// Returns an error if the worker thread cannot be spawned.
	pub fn new<C: Classifier + 'static>(
		engine: InferenceEngine<C>,
		preprocessor: Preprocessor,
		queue_size: usize,
	) -> std::io::Result<Self> {
		let health = Arc::new(AtomicHealth::new(Health::Starting));
		let (sender, mut rx) = mpsc::channel::<(ImageTensor, ResponseSender)>(queue_size.max(1));

		let worker_health = Arc::clone(&health);
		thread::Builder::new()
			.name("inference".to_string())
			.spawn(move || {
				worker_health.store(Health::Ready, Ordering::SeqCst);
				tracing::debug!("Inference worker ready");

				while let Some((tensor, tx)) = rx.blocking_recv() {
					worker_health.store(Health::Busy, Ordering::SeqCst);

					let started = Instant::now();
					let result = panic::catch_unwind(AssertUnwindSafe(|| engine.predict(&tensor)))
						.unwrap_or_else(|_| Err(PredictError::inference("forward pass panicked")));
					tracing::debug!("Prediction finished in {:?}", started.elapsed());

					if tx.send(result).is_err() {
						tracing::debug!("Client went away before its prediction finished");
					}

					worker_health.store(Health::Ready, Ordering::SeqCst);
				}

				worker_health.store(Health::Stopped, Ordering::SeqCst);
				tracing::info!("Inference worker stopped");
			})?;

		Ok(Self {
			health,
			sender,
			preprocessor,
		})
	}

	pub fn health(&self) -> Health {
		self.health.load(Ordering::SeqCst)
	}

	/// Preprocess an upload and rank its most likely classes.
	///
	/// # Errors
	///
	/// Returns [`PredictError::Decode`] for bytes that are not an image, and [`PredictError::Inference`] if
	/// the forward pass fails or the worker is no longer running.
	pub async fn classify<B>(&self, bytes: B) -> Result<PredictionResult, PredictError>
	where
		B: AsRef<[u8]> + Send + 'static,
	{
		let preprocessor = self.preprocessor;
		let tensor = tokio::task::spawn_blocking(move || preprocessor.preprocess(bytes.as_ref()))
			.await
			.map_err(|e| PredictError::Inference(e.into()))??;

		self.predict(tensor).await
	}

	/// Queue an already preprocessed tensor on the worker.
	///
	/// # Errors
	///
	/// Returns [`PredictError::Inference`] if the forward pass fails or the worker is no longer running.
	pub async fn predict(&self, tensor: ImageTensor) -> Result<PredictionResult, PredictError> {
		let (tx, rx) = oneshot::channel();

		self.sender
			.send((tensor, tx))
			.await
			.map_err(|_| PredictError::inference("inference worker is not running"))?;

		rx.await
			.map_err(|_| PredictError::inference("inference worker dropped the request"))?
	}

	pub fn extension(self) -> axum::Extension<Self> {
		axum::Extension(self)
	}
}
