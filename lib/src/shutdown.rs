use std::{future::Future, sync::Arc};

use tokio::{signal, sync::watch};

/// Resolves the server's graceful-shutdown future on Ctrl+C, SIGTERM, or [`Shutdown::start`].
#[derive(Debug, Clone)]
pub struct Shutdown {
	sender: Arc<watch::Sender<bool>>,
}

impl Shutdown {
	/// Create a handle and start listening for termination signals.
	///
	/// Must be called from within a tokio runtime.
	pub fn new() -> Self {
		let shutdown = Self::detached();

		let signalled = shutdown.clone();
		tokio::spawn(async move {
			wait_for_signal().await;
			tracing::info!("Received shutdown signal");
			signalled.start();
		});

		shutdown
	}

	fn detached() -> Self {
		let (sender, _) = watch::channel(false);

		Self {
			sender: Arc::new(sender),
		}
	}

	pub fn start(&self) {
		tracing::debug!("Shutdown requested");
		self.sender.send_replace(true);
	}

	pub fn handle(&self) -> impl Future<Output = ()> + Send + 'static {
		let mut receiver = self.sender.subscribe();

		async move {
			while !*receiver.borrow_and_update() {
				if receiver.changed().await.is_err() {
					return;
				}
			}
		}
	}
}

async fn wait_for_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::error!("Failed to install Ctrl+C handler: {e}");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(e) => {
				tracing::error!("Failed to install SIGTERM handler: {e}");
				std::future::pending::<()>().await;
			},
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}
}
