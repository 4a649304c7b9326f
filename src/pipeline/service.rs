//! Webhook service: per-invocation configuration, fetch, filter, build, and optional submit.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    algolia::{AlgoliaClient, IndexSink},
    config::{Config, EnvLookup},
    contentful::{ContentfulClient, EntrySource},
    pipeline::{
        builder::build_index_requests,
        filter::filter_searchable,
        types::{BridgeError, PipelineOutcome, WebhookBody},
    },
    transport::{HttpTransport, TransportOptions},
};

/// Parameters taken from the triggering request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookRequest {
    /// Target index override from the `index_name` query parameter.
    pub index_name: Option<String>,
}

/// Abstraction over a webhook invocation used by the HTTP surface and the CLI.
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Run the pipeline once and produce the response body.
    async fn handle(&self, request: WebhookRequest) -> Result<WebhookBody, BridgeError>;
}

/// Run fetch → filter → build, then submit when a sink is supplied.
pub async fn run_pipeline(
    source: &dyn EntrySource,
    sink: Option<&dyn IndexSink>,
    index_name: Option<&str>,
) -> Result<PipelineOutcome, BridgeError> {
    let entries = source.fetch_entries().await?;
    let searchable = filter_searchable(&entries);
    let requests = build_index_requests(searchable);
    tracing::info!(
        fetched = entries.len(),
        searchable = requests.len(),
        "Built index requests"
    );

    let acknowledgements = match sink {
        Some(sink) => Some(sink.submit(index_name, &requests).await?),
        None => {
            tracing::debug!("Indexing disabled; skipping submission");
            None
        }
    };

    Ok(PipelineOutcome {
        entries,
        requests,
        acknowledgements,
    })
}

/// Production [`WebhookApi`] that reads configuration from the environment on every call.
///
/// Only the HTTP connection pool outlives an invocation; credentials, targets, and switches are
/// re-read each time so the handler holds no state between requests.
pub struct BridgeService {
    env: Arc<dyn EnvLookup>,
    client: Client,
}

impl BridgeService {
    /// Build a service reading from `env`.
    pub fn new(env: Arc<dyn EnvLookup>) -> Result<Self, BridgeError> {
        let transport =
            HttpTransport::new(TransportOptions::default()).map_err(BridgeError::Client)?;
        Ok(Self::with_transport(env, &transport))
    }

    /// Build a service that shares `transport`'s connection pool.
    pub fn with_transport(env: Arc<dyn EnvLookup>, transport: &HttpTransport) -> Self {
        Self {
            env,
            client: transport.client().clone(),
        }
    }

    async fn invoke(
        &self,
        request: &WebhookRequest,
    ) -> Result<(Config, PipelineOutcome), BridgeError> {
        let config = Config::from_lookup(self.env.as_ref())?;
        let transport = HttpTransport::with_client(
            self.client.clone(),
            TransportOptions {
                origin_hint: config.origin_hint.clone(),
            },
        );

        let contentful = ContentfulClient::new(&config.contentful, transport.clone())?;
        let algolia = if config.indexing_enabled {
            Some(AlgoliaClient::new(&config.algolia, transport)?)
        } else {
            None
        };

        let outcome = run_pipeline(
            &contentful,
            algolia.as_ref().map(|client| client as &dyn IndexSink),
            request.index_name.as_deref(),
        )
        .await?;
        Ok((config, outcome))
    }
}

#[async_trait]
impl WebhookApi for BridgeService {
    async fn handle(&self, request: WebhookRequest) -> Result<WebhookBody, BridgeError> {
        let (config, outcome) = self.invoke(&request).await?;
        Ok(outcome.into_body(config.response_body))
    }
}
