//! HTTP client for the Algolia batch write API.

use reqwest::{Method, Url};
use serde_json::Value;

use crate::config::AlgoliaConfig;
use crate::transport::HttpTransport;

use super::types::{AlgoliaError, BatchPayload, IndexRequest};

/// Writes index requests to one Algolia application.
pub struct AlgoliaClient {
    pub(crate) transport: HttpTransport,
    pub(crate) base_url: Url,
    pub(crate) app_id: String,
    pub(crate) admin_key: String,
    pub(crate) config: AlgoliaConfig,
}

impl AlgoliaClient {
    /// Construct a client, failing when the app id or admin key is missing.
    pub fn new(config: &AlgoliaConfig, transport: HttpTransport) -> Result<Self, AlgoliaError> {
        let app_id = config
            .app_id
            .clone()
            .ok_or(AlgoliaError::MissingCredentials("ALGOLIA_APP_ID"))?;
        let admin_key = config
            .admin_key
            .clone()
            .ok_or(AlgoliaError::MissingCredentials("ALGOLIA_ADMIN_KEY"))?;

        let base = config
            .api_url
            .clone()
            .unwrap_or_else(|| format!("https://{app_id}-dsn.algolia.net"));
        let base_url = Url::parse(&base).map_err(|err| AlgoliaError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(AlgoliaError::InvalidUrl(base));
        }

        tracing::debug!(url = %base_url, app_id = %app_id, "Initialized Algolia client");
        Ok(Self {
            transport,
            base_url,
            app_id,
            admin_key,
            config: config.clone(),
        })
    }

    /// Batch endpoint for `index_name`.
    pub fn batch_url(&self, index_name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["1", "indexes", index_name, "batch"]);
        }
        url
    }

    /// Submit requests to the index named by `requested_index`, `ALGOLIA_INDEX`, or the default.
    ///
    /// Requests go out in one call unless a batch size is configured, in which case chunks are
    /// sent one after another. Returns one acknowledgement per call; per-record errors inside
    /// an acknowledgement are not inspected. An empty request list makes no call.
    pub async fn submit(
        &self,
        requested_index: Option<&str>,
        requests: &[IndexRequest],
    ) -> Result<Vec<Value>, AlgoliaError> {
        let index_name = self.config.resolve_index_name(requested_index);
        if requests.is_empty() {
            tracing::debug!(index = %index_name, "No index requests to submit");
            return Ok(Vec::new());
        }

        let chunk_size = self.config.batch_size.unwrap_or(requests.len());
        let url = self.batch_url(&index_name);
        let mut acknowledgements = Vec::new();
        for chunk in requests.chunks(chunk_size) {
            acknowledgements.push(self.send_batch(url.clone(), &index_name, chunk).await?);
        }

        tracing::info!(
            index = %index_name,
            requests = requests.len(),
            batches = acknowledgements.len(),
            "Submitted index requests"
        );
        Ok(acknowledgements)
    }

    async fn send_batch(
        &self,
        url: Url,
        index_name: &str,
        requests: &[IndexRequest],
    ) -> Result<Value, AlgoliaError> {
        let response = self
            .transport
            .request(Method::POST, url)
            .header("X-Algolia-API-Key", &self.admin_key)
            .header("X-Algolia-Application-Id", &self.app_id)
            .json(&BatchPayload { requests })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let error = AlgoliaError::UnexpectedStatus { status, body };
            tracing::error!(index = index_name, error = %error, "Algolia batch failed");
            return Err(error);
        }

        let acknowledgement: Value = serde_json::from_str(&body)?;
        tracing::debug!(
            index = index_name,
            requests = requests.len(),
            task_id = ?acknowledgement.get("taskID"),
            "Algolia batch acknowledged"
        );
        Ok(acknowledgement)
    }
}
