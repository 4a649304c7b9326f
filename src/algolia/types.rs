//! Batch API payloads and errors.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while interacting with Algolia.
#[derive(Debug, Error)]
pub enum AlgoliaError {
    /// A credential needed to talk to the index was not configured.
    #[error("Missing Algolia credential: {0}")]
    MissingCredentials(&'static str),
    /// Base URL failed to parse or cannot carry path segments.
    #[error("Invalid Algolia URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Algolia responded with an unexpected status code.
    #[error("Unexpected Algolia response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Algolia.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Acknowledgement body was not JSON.
    #[error("Malformed Algolia response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Write operation applied by one batch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchAction {
    /// Add the record, replacing any record with the same `objectID`.
    AddObject,
}

/// One entry of the `requests` array sent to `/1/indexes/{index}/batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRequest {
    /// Operation to apply.
    pub action: BatchAction,
    /// Record contents, including `objectID` when one could be derived.
    pub body: Map<String, Value>,
}

impl IndexRequest {
    /// Build an `addObject` request.
    pub fn add_object(body: Map<String, Value>) -> Self {
        Self {
            action: BatchAction::AddObject,
            body,
        }
    }

    /// The record key, if present.
    pub fn object_id(&self) -> Option<&str> {
        self.body.get("objectID")?.as_str()
    }
}

#[derive(Serialize)]
pub(crate) struct BatchPayload<'a> {
    pub(crate) requests: &'a [IndexRequest],
}
