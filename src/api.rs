//! HTTP surface for the webhook.
//!
//! - `ANY /` – Run one invocation. Accepts an optional `index_name` query parameter that
//!   overrides the target index. Always answers `200 OK` with a JSON body: the configured
//!   pipeline product on success, or the error message as a JSON string on failure.
//! - `GET /health` – Liveness probe.

use crate::pipeline::{WebhookApi, WebhookBody, WebhookRequest};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{any, get},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Build the HTTP router exposing the webhook.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: WebhookApi + 'static,
{
    Router::new()
        .route("/", any(handle_webhook::<S>))
        .route("/health", get(health))
        .with_state(service)
}

/// Query string accepted by the webhook.
#[derive(Debug, Default, Deserialize)]
struct WebhookParams {
    /// Target index override.
    #[serde(default)]
    index_name: Option<String>,
}

/// Run the pipeline and map any failure into the response body.
///
/// Query strings that fail to parse are treated as absent so that every failure mode answers
/// the same way.
async fn handle_webhook<S>(
    State(service): State<Arc<S>>,
    params: Option<Query<WebhookParams>>,
) -> Json<WebhookBody>
where
    S: WebhookApi,
{
    let params = params.map(|Query(params)| params).unwrap_or_default();
    let request = WebhookRequest {
        index_name: params.index_name.filter(|name| !name.trim().is_empty()),
    };
    let span = tracing::info_span!(
        "webhook",
        invocation_id = %Uuid::new_v4(),
        index_name = ?request.index_name
    );

    async move {
        match service.handle(request).await {
            Ok(body) => {
                tracing::info!("Webhook completed");
                Json(body)
            }
            Err(error) => {
                tracing::error!(error = %error, "Webhook failed");
                Json(WebhookBody::from(error))
            }
        }
    }
    .instrument(span)
    .await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
