//! Contentful delivery API integration.

pub mod client;
pub mod resolve;
pub mod types;

use async_trait::async_trait;

pub use client::ContentfulClient;
pub use resolve::resolve_collection;
pub use types::{ContentfulError, EntryCollection, Includes, ResolvedEntry, is_truthy};

/// Source of resolved entries for the indexing pipeline.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch every entry of the configured content type with links resolved.
    async fn fetch_entries(&self) -> Result<Vec<ResolvedEntry>, ContentfulError>;
}

#[async_trait]
impl EntrySource for ContentfulClient {
    async fn fetch_entries(&self) -> Result<Vec<ResolvedEntry>, ContentfulError> {
        ContentfulClient::fetch_entries(self).await
    }
}
