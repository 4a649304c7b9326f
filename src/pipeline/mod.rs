//! Webhook pipeline: searchable filter, index request builder, and orchestration.

pub mod builder;
pub mod filter;
mod service;
pub mod types;

pub use builder::{build_index_request, build_index_requests, object_id};
pub use filter::filter_searchable;
pub use service::{BridgeService, WebhookApi, WebhookRequest, run_pipeline};
pub use types::{BridgeError, PipelineOutcome, WebhookBody};
