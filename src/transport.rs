//! Shared outbound HTTP client with edge routing options.

use reqwest::{Client, Method, RequestBuilder, Url};

/// Header carrying the origin hint to the edge platform's router.
pub const ORIGIN_HINT_HEADER: &str = "x-edge-origin";

const USER_AGENT: &str = concat!("searchbridge/", env!("CARGO_PKG_VERSION"));

/// Options applied to every outbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Named origin the platform should route the request through.
    pub origin_hint: Option<String>,
}

/// Thin wrapper over [`reqwest::Client`] that applies [`TransportOptions`] uniformly.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    options: TransportOptions,
}

impl HttpTransport {
    /// Build a transport with a fresh client.
    pub fn new(options: TransportOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, options))
    }

    /// Reuse an existing client; connection pools are shared across clones.
    pub fn with_client(client: Client, options: TransportOptions) -> Self {
        Self { client, options }
    }

    /// Underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Start a request, attaching the origin hint when configured.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(origin) = self
            .options
            .origin_hint
            .as_deref()
            .filter(|origin| !origin.is_empty())
        {
            request = request.header(ORIGIN_HINT_HEADER, origin);
        }
        request
    }
}
