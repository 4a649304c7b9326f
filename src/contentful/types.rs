//! Entry shapes returned by the Contentful delivery API.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while fetching entries from Contentful.
#[derive(Debug, Error)]
pub enum ContentfulError {
    /// Base URL failed to parse or cannot carry path segments.
    #[error("Invalid Contentful URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Contentful responded with an unexpected status code.
    #[error("Unexpected Contentful response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Contentful.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response body was not the expected JSON document.
    #[error("Malformed Contentful response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One page of the `/entries` collection endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryCollection {
    /// Total number of entries matching the query across all pages.
    #[serde(default)]
    pub total: u64,
    /// Offset of this page.
    #[serde(default)]
    pub skip: u64,
    /// Page size the API applied.
    #[serde(default)]
    pub limit: u64,
    /// Entries on this page, links still unresolved.
    #[serde(default)]
    pub items: Vec<Value>,
    /// Linked entries and assets referenced from `items`.
    #[serde(default)]
    pub includes: Includes,
}

/// Side-loaded entities referenced by links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    /// Linked entries.
    #[serde(default, rename = "Entry")]
    pub entries: Vec<Value>,
    /// Linked assets.
    #[serde(default, rename = "Asset")]
    pub assets: Vec<Value>,
}

/// Entry whose link pointers have been replaced with the linked entities.
///
/// The entry is kept as the raw JSON object so every field the API returns survives into the
/// response and the index body. Accessors make the optional parts explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedEntry(Map<String, Value>);

impl ResolvedEntry {
    /// Build an entry from a JSON value; non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(Self(object)),
            _ => None,
        }
    }

    /// Entry identifier from `sys.id`.
    pub fn id(&self) -> Option<&str> {
        self.0.get("sys")?.get("id")?.as_str()
    }

    /// Content type identifier from `sys.contentType.sys.id`.
    pub fn content_type(&self) -> Option<&str> {
        self.0
            .get("sys")?
            .get("contentType")?
            .get("sys")?
            .get("id")?
            .as_str()
    }

    /// The `fields` mapping, if the entry has one.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.get("fields")?.as_object()
    }

    /// A single field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields()?.get(name)
    }

    /// A field value that is truthy in the JavaScript sense.
    pub fn truthy_field(&self, name: &str) -> Option<&Value> {
        self.field(name).filter(|value| is_truthy(value))
    }

    /// Whether the entry opted into search via `fields.isSearchable`.
    pub fn is_searchable(&self) -> bool {
        self.truthy_field("isSearchable").is_some()
    }

    /// Borrow the underlying JSON object.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// JavaScript truthiness for JSON values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
