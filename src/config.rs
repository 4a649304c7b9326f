use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Content type fetched from Contentful unless overridden.
pub const DEFAULT_CONTENT_TYPE: &str = "blogPost";
/// Contentful environment used when `CONTENTFUL_ENVIRONMENT_ID` is absent.
pub const DEFAULT_ENVIRONMENT_ID: &str = "master";
/// Delivery API host.
pub const DEFAULT_CONTENTFUL_API_URL: &str = "https://cdn.contentful.com";
/// Index written to when neither the query string nor `ALGOLIA_INDEX` names one.
pub const DEFAULT_INDEX_NAME: &str = "contentful_blogs_pages";
/// Page size requested from the entries endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Largest page size the delivery API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;
/// Origin the edge platform routes outbound requests through.
pub const DEFAULT_ORIGIN_HINT: &str = "contentful";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Read-only accessor over the platform environment.
///
/// The webhook reads its configuration through this trait once per invocation, which lets tests
/// supply a fixed map instead of mutating the process environment.
pub trait EnvLookup: Send + Sync {
    /// Return the raw value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

/// [`EnvLookup`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Runtime configuration for a single webhook invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Content source settings.
    pub contentful: ContentfulConfig,
    /// Search index settings.
    pub algolia: AlgoliaConfig,
    /// Whether built index requests are submitted to Algolia.
    pub indexing_enabled: bool,
    /// Which pipeline product is returned as the response body.
    pub response_body: ResponseBody,
    /// Origin hint attached to outbound requests; `None` disables the header.
    pub origin_hint: Option<String>,
}

/// Credentials and query parameters for the Contentful delivery API.
#[derive(Debug, Clone)]
pub struct ContentfulConfig {
    /// Base URL of the delivery API.
    pub api_url: String,
    /// Space identifier.
    pub space_id: String,
    /// Delivery access token, sent as a query parameter.
    pub access_token: String,
    /// Environment identifier, `master` unless configured.
    pub environment_id: String,
    /// Content type filter applied to the entries query.
    pub content_type: String,
    /// Number of entries requested per page.
    pub page_size: u32,
}

/// Credentials and targeting for the Algolia batch API.
#[derive(Debug, Clone)]
pub struct AlgoliaConfig {
    /// Application identifier; only required when indexing is enabled.
    pub app_id: Option<String>,
    /// Admin API key; only required when indexing is enabled.
    pub admin_key: Option<String>,
    /// Index used when the request does not name one.
    pub default_index: Option<String>,
    /// Override for the API host, mainly for tests and proxies.
    pub api_url: Option<String>,
    /// Maximum requests per batch call; `None` sends everything in one call.
    pub batch_size: Option<usize>,
}

impl AlgoliaConfig {
    /// Resolve the target index: explicit override, then `ALGOLIA_INDEX`, then the default.
    ///
    /// Blank overrides fall through the chain.
    pub fn resolve_index_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or(self.default_index.as_deref())
            .unwrap_or(DEFAULT_INDEX_NAME)
            .to_string()
    }
}

/// Selects which stage of the pipeline is serialized into the webhook response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseBody {
    /// Raw fetched entries after link resolution.
    #[default]
    Entries,
    /// Index requests built from searchable entries.
    Requests,
    /// Acknowledgements returned by the index API.
    Acknowledgements,
}

impl std::str::FromStr for ResponseBody {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entries" => Ok(Self::Entries),
            "requests" => Ok(Self::Requests),
            "acknowledgements" | "acks" => Ok(Self::Acknowledgements),
            _ => Err(()),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    /// Load configuration from an arbitrary environment accessor, validating along the way.
    pub fn from_lookup(env: &dyn EnvLookup) -> Result<Self, ConfigError> {
        let contentful = ContentfulConfig {
            api_url: load_optional(env, "CONTENTFUL_API_URL")
                .unwrap_or_else(|| DEFAULT_CONTENTFUL_API_URL.to_string()),
            space_id: load_required(env, "CONTENTFUL_SPACE_ID")?,
            access_token: load_required(env, "CONTENTFUL_ACCESS_TOKEN")?,
            environment_id: load_optional(env, "CONTENTFUL_ENVIRONMENT_ID")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT_ID.to_string()),
            content_type: load_optional(env, "CONTENTFUL_CONTENT_TYPE")
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            page_size: load_optional(env, "CONTENTFUL_PAGE_SIZE")
                .map(|value| {
                    value
                        .parse::<u32>()
                        .ok()
                        .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                        .ok_or_else(|| ConfigError::InvalidValue("CONTENTFUL_PAGE_SIZE".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let algolia = AlgoliaConfig {
            app_id: load_optional(env, "ALGOLIA_APP_ID"),
            admin_key: load_optional(env, "ALGOLIA_ADMIN_KEY"),
            default_index: load_optional(env, "ALGOLIA_INDEX"),
            api_url: load_optional(env, "ALGOLIA_API_URL"),
            batch_size: load_optional(env, "ALGOLIA_BATCH_SIZE")
                .map(|value| {
                    value
                        .parse::<usize>()
                        .ok()
                        .filter(|size| *size > 0)
                        .ok_or_else(|| ConfigError::InvalidValue("ALGOLIA_BATCH_SIZE".into()))
                })
                .transpose()?,
        };

        Ok(Self {
            contentful,
            algolia,
            indexing_enabled: load_optional(env, "INDEXING_ENABLED")
                .map(|value| {
                    parse_bool(&value)
                        .ok_or_else(|| ConfigError::InvalidValue("INDEXING_ENABLED".into()))
                })
                .transpose()?
                .unwrap_or(false),
            response_body: load_optional(env, "RESPONSE_BODY")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("RESPONSE_BODY".into()))
                })
                .transpose()?
                .unwrap_or_default(),
            // An explicitly empty EDGE_ORIGIN turns the hint off.
            origin_hint: match env.get("EDGE_ORIGIN") {
                Some(value) if value.trim().is_empty() => None,
                Some(value) => Some(value.trim().to_string()),
                None => Some(DEFAULT_ORIGIN_HINT.to_string()),
            },
        })
    }
}

fn load_required(env: &dyn EnvLookup, key: &str) -> Result<String, ConfigError> {
    load_optional(env, key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_optional(env: &dyn EnvLookup, key: &str) -> Option<String> {
    env.get(key).filter(|value| !value.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load `.env` into the process environment if one is present.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
}
