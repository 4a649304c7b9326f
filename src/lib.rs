#![deny(missing_docs)]

//! Webhook bridge that resolves Contentful entries and upserts the searchable ones into Algolia.

/// Algolia batch API integration.
pub mod algolia;
/// HTTP routing for the webhook.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Contentful delivery API integration and link resolution.
pub mod contentful;
/// Structured logging and tracing setup.
pub mod logging;
/// Filter, request builder, and orchestration.
pub mod pipeline;
/// Shared outbound HTTP transport.
pub mod transport;
