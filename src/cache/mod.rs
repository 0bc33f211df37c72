//! Resource cache for extracted document values
//!
//! Values of every resource live in one tree keyed by canonical path
//! segments. Raw documents live in a separate blob store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ResourceCache                        │
//! │   (validity checks, eviction, fetch_or_load)            │
//! └─────────────────────────────────────────────────────────┘
//!              │                              │
//!              ▼                              ▼
//!   ┌──────────────────────┐       ┌──────────────────────┐
//!   │  RwLock<value tree>  │       │ RwLock<documents>    │
//!   │  + tag table         │       │ + tag table          │
//!   └──────────────────────┘       └──────────────────────┘
//!              │
//!              ▼
//!   resolve_start ──▶ traverse ──▶ translate_output_path
//! ```
//!
//! # Usage
//!
//! ```rust
//! use deeplink_cache::cache::{ResourceCache, ValueBatch};
//! use deeplink_cache::path::DocumentKind;
//!
//! let cache = ResourceCache::default();
//! let batch = ValueBatch::new("/CsvTest/")
//!     .text("A1", "x")
//!     .text("B1", "y")
//!     .text("A2", "z")
//!     .text("B2", "w");
//! cache.insert_values("CsvTest", None, &batch, DocumentKind::Csv).unwrap();
//!
//! let column = cache.fetch_values("/CsvTest/B*", DocumentKind::Csv).unwrap();
//! assert_eq!(column.base_uri, "/CsvTest/");
//! assert_eq!(column.values[1].sub_uri, "B2");
//! ```

mod node;
mod resource;
mod source;
mod traversal;
mod types;

pub use node::{CachedValue, Child, TreeNode};
pub use resource::{CacheStats, ResourceCache};
pub use source::{DocumentSource, ValueSource};
pub use traversal::{resolve_start, traverse, Hit, StartNode};
pub use types::{Payload, ValidationTag, Value, ValueBatch, ValueItem, ValueList};
