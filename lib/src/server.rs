use std::sync::Arc;

use aide::openapi::{self, OpenApi};
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::get, Extension, Json, Router, Server};

use crate::{config::ServerConfig, routes, runner::Runner, shutdown::Shutdown};

/// Serve predictions until a termination signal arrives.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails while running.
pub async fn start(config: &ServerConfig, runner: Runner) -> Result<()> {
	let shutdown = Shutdown::new();
	let addr = config.addr();

	tracing::info!("Starting server on {addr}...");
	Server::try_bind(&addr)?
		.serve(app(runner, config.max_upload_bytes).into_make_service())
		.with_graceful_shutdown(shutdown.handle())
		.await?;

	tracing::info!("Server stopped");
	Ok(())
}

/// The full application: documented routes, the OpenAPI document, and the runner they share.
///
/// Request bodies larger than `max_upload_bytes` are rejected with `413 Payload Too Large`.
pub fn app(runner: Runner, max_upload_bytes: usize) -> Router {
	let (router, api) = documented_router();

	router
		.route("/openapi.json", get(serve_openapi))
		.layer(DefaultBodyLimit::max(max_upload_bytes))
		.layer(Extension(Arc::new(api)))
		.layer(runner.extension())
}

/// The OpenAPI document describing every route.
#[must_use]
pub fn openapi() -> OpenApi {
	documented_router().1
}

fn documented_router() -> (Router, OpenApi) {
	let mut api = OpenApi {
		info: openapi::Info {
			title: "Dog Breed Classifier".to_string(),
			version: env!("CARGO_PKG_VERSION").to_string(),
			..openapi::Info::default()
		},
		..OpenApi::default()
	};

	let router = routes::handler().finish_api(&mut api);
	(router, api)
}

#[allow(clippy::unused_async)]
async fn serve_openapi(Extension(api): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
	Json(api.as_ref().clone())
}
