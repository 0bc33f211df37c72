//! Deeplink cache
//!
//! Hierarchical addressing and caching for fragments of documents
//! (spreadsheet cells, table paragraphs, PDF lines) behind deep-link URIs.
//!
//! # Modules
//!
//! - `path`: segment ordering, per-kind policies, reference translation
//! - `cache`: value tree, bulk traversal, resource cache
//! - `config`: runtime settings
//! - `telemetry`: tracing subscriber bootstrap

pub mod cache;
pub mod config;
pub mod error;
pub mod path;
pub mod telemetry;

pub use cache::{CacheStats, ResourceCache, ValidationTag, ValueBatch, ValueList, ValueSource};
pub use config::{CacheConfig, ConfigError};
pub use error::{CacheError, Result};
pub use path::{DocumentKind, RangeDelimiter};
