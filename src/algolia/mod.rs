//! Algolia search index integration.

pub mod client;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

pub use client::AlgoliaClient;
pub use types::{AlgoliaError, BatchAction, IndexRequest};

/// Destination for built index requests.
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Persist `requests`, returning the index API's acknowledgements.
    async fn submit(
        &self,
        requested_index: Option<&str>,
        requests: &[IndexRequest],
    ) -> Result<Vec<Value>, AlgoliaError>;
}

#[async_trait]
impl IndexSink for AlgoliaClient {
    async fn submit(
        &self,
        requested_index: Option<&str>,
        requests: &[IndexRequest],
    ) -> Result<Vec<Value>, AlgoliaError> {
        AlgoliaClient::submit(self, requested_index, requests).await
    }
}
