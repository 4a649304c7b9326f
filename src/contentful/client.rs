//! HTTP client for the Contentful delivery API.

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::{TryStreamExt, pin_mut};
use reqwest::{Method, Url};

use crate::config::ContentfulConfig;
use crate::transport::HttpTransport;

use super::resolve::resolve_collection;
use super::types::{ContentfulError, EntryCollection, ResolvedEntry};

/// Fetches and resolves entries of one content type.
pub struct ContentfulClient {
    pub(crate) transport: HttpTransport,
    pub(crate) entries_url: Url,
    pub(crate) access_token: String,
    pub(crate) content_type: String,
    pub(crate) page_size: u32,
}

impl ContentfulClient {
    /// Construct a client from explicit configuration.
    pub fn new(
        config: &ContentfulConfig,
        transport: HttpTransport,
    ) -> Result<Self, ContentfulError> {
        let entries_url = entries_url(&config.api_url, &config.space_id, &config.environment_id)?;
        tracing::debug!(
            url = %entries_url,
            content_type = %config.content_type,
            page_size = config.page_size,
            "Initialized Contentful client"
        );

        Ok(Self {
            transport,
            entries_url,
            access_token: config.access_token.clone(),
            content_type: config.content_type.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetch one page of raw entries starting at `skip`.
    pub async fn fetch_page(&self, skip: u64) -> Result<EntryCollection, ContentfulError> {
        let limit = self.page_size.to_string();
        let skip_param = skip.to_string();
        let response = self
            .transport
            .request(Method::GET, self.entries_url.clone())
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("content_type", self.content_type.as_str()),
                ("limit", limit.as_str()),
                ("skip", skip_param.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let error = ContentfulError::UnexpectedStatus { status, body };
            tracing::error!(skip, error = %error, "Contentful entries request failed");
            return Err(error);
        }

        let page: EntryCollection = serde_json::from_str(&body).map_err(|err| {
            tracing::error!(skip, error = %err, "Contentful returned a malformed body");
            ContentfulError::Decode(err)
        })?;
        tracing::debug!(
            skip,
            total = page.total,
            items = page.items.len(),
            "Fetched Contentful page"
        );
        Ok(page)
    }

    /// Stream pages until the collection's `total` is covered or a page comes back empty.
    pub fn pages(&self) -> impl Stream<Item = Result<EntryCollection, ContentfulError>> + '_ {
        try_stream! {
            let mut skip = 0_u64;
            loop {
                let page = self.fetch_page(skip).await?;
                let received = page.items.len() as u64;
                let total = page.total;
                yield page;

                skip += received;
                if received == 0 || skip >= total {
                    break;
                }
            }
        }
    }

    /// Fetch every page and resolve links, preserving API order.
    pub async fn fetch_entries(&self) -> Result<Vec<ResolvedEntry>, ContentfulError> {
        let pages = self.pages();
        pin_mut!(pages);

        let mut entries = Vec::new();
        while let Some(page) = pages.try_next().await? {
            entries.extend(resolve_collection(page));
        }

        tracing::info!(
            content_type = %self.content_type,
            entries = entries.len(),
            "Fetched Contentful entries"
        );
        Ok(entries)
    }
}

fn entries_url(base: &str, space_id: &str, environment_id: &str) -> Result<Url, ContentfulError> {
    let mut url = Url::parse(base).map_err(|err| ContentfulError::InvalidUrl(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ContentfulError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["spaces", space_id, "environments", environment_id, "entries"]);
    Ok(url)
}
