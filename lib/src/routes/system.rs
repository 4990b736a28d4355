use aide::axum::{routing::get, ApiRouter};
use axum::Extension;
use axum_jsonschema::Json;
use breed_core::http::RootResponse;
use schemars::JsonSchema;

use crate::runner::{Health, Runner};

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.api_route("/", get(root))
		.api_route("/health-check", get(health_check))
}

#[allow(clippy::unused_async)]
pub async fn root() -> Json<RootResponse> {
	Json(RootResponse {
		message: "Dog breed prediction API is running".to_string(),
	})
}

#[derive(Debug, serde::Serialize, JsonSchema)]
pub struct HealthCheck {
	/// Current state of the inference worker
	pub status: Health,
}

#[allow(clippy::unused_async)]
pub async fn health_check(Extension(runner): Extension<Runner>) -> Json<HealthCheck> {
	Json(HealthCheck {
		status: runner.health(),
	})
}
