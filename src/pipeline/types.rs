//! Pipeline results and the error taxonomy surfaced by the webhook.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    algolia::{AlgoliaError, IndexRequest},
    config::{ConfigError, ResponseBody},
    contentful::{ContentfulError, ResolvedEntry},
};

/// Errors emitted by a webhook invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Environment did not describe a usable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Outbound HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Fetching or decoding entries failed.
    #[error("Contentful request failed: {0}")]
    Contentful(#[from] ContentfulError),
    /// Submitting index requests failed.
    #[error("Algolia request failed: {0}")]
    Algolia(#[from] AlgoliaError),
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    /// Entries as fetched, links resolved, before filtering.
    pub entries: Vec<ResolvedEntry>,
    /// Requests built from the searchable entries.
    pub requests: Vec<IndexRequest>,
    /// Index acknowledgements; `None` when submission is disabled.
    pub acknowledgements: Option<Vec<Value>>,
}

impl PipelineOutcome {
    /// Select the response body for `mode`.
    pub fn into_body(self, mode: ResponseBody) -> WebhookBody {
        match mode {
            ResponseBody::Entries => WebhookBody::Entries(self.entries),
            ResponseBody::Requests => WebhookBody::Requests(self.requests),
            ResponseBody::Acknowledgements => {
                WebhookBody::Acknowledgements(self.acknowledgements.unwrap_or_default())
            }
        }
    }
}

/// JSON body returned by the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookBody {
    /// Fetched entries.
    Entries(Vec<ResolvedEntry>),
    /// Built index requests.
    Requests(Vec<IndexRequest>),
    /// Index API acknowledgements.
    Acknowledgements(Vec<Value>),
    /// Error message of a failed invocation, serialized as a JSON string.
    Error(String),
}

impl From<BridgeError> for WebhookBody {
    fn from(error: BridgeError) -> Self {
        Self::Error(error.to_string())
    }
}
