//! Resource cache
//!
//! Two independent stores share one handle:
//!
//! - the value tree, holding every extracted value of every resource under
//!   `/<resource id>/...`
//! - the document store, holding raw document bytes per resource id
//!
//! Each store sits behind its own `RwLock` together with its own table of
//! validation tags, and no call ever holds both locks at once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::path::{
    is_bulk_token, split_uri, translate_input_path, translate_output_path, DocumentKind,
    RangeDelimiter,
};

use super::node::{CachedValue, TreeNode};
use super::traversal::{resolve_start, traverse};
use super::types::{ValidationTag, Value, ValueBatch, ValueList};

/// Recorded tag per resource id; `None` marks a resource cached without one
type TagTable = HashMap<String, Option<ValidationTag>>;

#[derive(Default)]
struct ValueStore {
    root: TreeNode,
    tags: TagTable,
}

#[derive(Default)]
struct DocumentStore {
    blobs: HashMap<String, Arc<[u8]>>,
    tags: TagTable,
}

/// Store with per-resource validation tags
trait TaggedStore {
    fn holds(&self, resource_id: &str) -> bool;
    fn tags(&self) -> &TagTable;
    fn evict(&mut self, resource_id: &str) -> bool;

    /// Whether the cached copy of `resource_id` may be served for `tag`
    ///
    /// Resources cached without a tag never go stale.
    fn is_current(&self, resource_id: &str, tag: Option<&ValidationTag>) -> bool {
        if !self.holds(resource_id) {
            return false;
        }
        match self.tags().get(resource_id) {
            Some(Some(recorded)) => Some(recorded) == tag,
            Some(None) | None => true,
        }
    }
}

impl TaggedStore for ValueStore {
    fn holds(&self, resource_id: &str) -> bool {
        self.root.contains(resource_id)
    }

    fn tags(&self) -> &TagTable {
        &self.tags
    }

    fn evict(&mut self, resource_id: &str) -> bool {
        self.tags.remove(resource_id);
        self.root.remove(resource_id).is_some()
    }
}

impl TaggedStore for DocumentStore {
    fn holds(&self, resource_id: &str) -> bool {
        self.blobs.contains_key(resource_id)
    }

    fn tags(&self) -> &TagTable {
        &self.tags
    }

    fn evict(&mut self, resource_id: &str) -> bool {
        self.tags.remove(resource_id);
        self.blobs.remove(resource_id).is_some()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resources with at least one cached value
    pub value_resources: usize,
    /// Leaf values across all resources
    pub cached_values: usize,
    pub documents: usize,
    pub document_bytes: usize,
}

struct ResourceCacheInner {
    config: CacheConfig,
    values: RwLock<ValueStore>,
    documents: RwLock<DocumentStore>,
}

/// Thread-safe cache of extracted values and raw documents
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<ResourceCacheInner>,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ResourceCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(ResourceCacheInner {
                config,
                values: RwLock::new(ValueStore::default()),
                documents: RwLock::new(DocumentStore::default()),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Insert all values of `batch` for `resource_id` and record its tag
    ///
    /// The batch is staged and checked before the write lock is taken, so a
    /// batch with a bad item leaves the cache untouched and readers never
    /// observe a partial batch. Returns the number of values stored.
    pub fn insert_values(
        &self,
        resource_id: &str,
        tag: Option<ValidationTag>,
        batch: &ValueBatch,
        kind: DocumentKind,
    ) -> Result<usize> {
        let delimiter = self.inner.config.range_delimiter;

        let mut staged = TreeNode::new();
        for (index, item) in batch.items.iter().enumerate() {
            let Some(sub_uri) = item.sub_uri.as_deref() else {
                tracing::warn!(resource_id, index, "Rejecting batch: value without sub-address");
                return Err(CacheError::MissingSubAddress { index });
            };

            let segments = split_uri(&format!("{}/{}", batch.base_uri, sub_uri))?;
            let segments = translate_input_path(segments, kind, delimiter)?;
            validate_insert_path(resource_id, &segments, kind, delimiter).map_err(|e| {
                tracing::warn!(resource_id, sub_uri, error = %e, "Rejecting batch");
                e
            })?;

            let leaf = CachedValue::new(item.value.clone(), item.type_tag.clone());
            staged.insert_path(&segments, leaf).map_err(|e| {
                tracing::error!(resource_id, sub_uri, error = %e, "Conflicting paths in batch");
                e
            })?;
        }

        let count = batch.items.len();
        let mut store = self.inner.values.write();
        if let Some(path) = store.root.merge_conflict(&staged) {
            tracing::error!(resource_id, path = %path, "Batch conflicts with cached values");
            return Err(CacheError::InvalidChild(format!(
                "/{} mixes a value and a subtree",
                path
            )));
        }
        store.root.merge(staged);
        store.tags.insert(resource_id.to_string(), tag);

        tracing::debug!(resource_id, kind = %kind, count, "Cached values");
        Ok(count)
    }

    /// Answer a query from the value tree
    ///
    /// `uri` starts with the resource id, e.g. `/CsvTest/B*`. A missing
    /// fixed segment, or a missing point for a query without bulk tokens, is
    /// `NotFound`. A bulk query that matches nothing is an empty list.
    pub fn fetch_values(&self, uri: &str, kind: DocumentKind) -> Result<ValueList> {
        let config = &self.inner.config;
        let delimiter = config.range_delimiter;
        let segments = translate_input_path(split_uri(uri)?, kind, delimiter)?;

        let store = self.inner.values.read();
        let start = resolve_start(&store.root, &segments, kind, delimiter).map_err(|e| {
            if let CacheError::CorruptCache(_) = e {
                tracing::error!(uri, error = %e, "Corrupt value tree");
            }
            e
        })?;

        let values: Vec<Value> = traverse(start.node, &segments[start.consumed..], delimiter)
            .into_iter()
            .filter(|hit| !(config.drop_empty_values && hit.value.value.is_empty()))
            .map(|hit| hit.value.to_value(translate_output_path(&hit.path, kind, delimiter)))
            .collect();

        tracing::debug!(uri, kind = %kind, count = values.len(), "Fetched values");
        Ok(ValueList {
            base_uri: start.base_uri,
            values,
        })
    }

    /// Whether the cached values of `resource_id` are current for `tag`
    ///
    /// A stale resource is evicted before `false` is returned. The answer
    /// only describes the instant it was computed.
    pub fn check_validity_values(&self, resource_id: &str, tag: Option<&ValidationTag>) -> bool {
        check_validity(&self.inner.values, "values", resource_id, tag)
    }

    /// Remove every value of `resource_id` and its recorded tag
    pub fn evict_values(&self, resource_id: &str) -> bool {
        let evicted = self.inner.values.write().evict(resource_id);
        if evicted {
            tracing::debug!(resource_id, "Evicted values");
        }
        evicted
    }

    pub fn contains_values(&self, resource_id: &str) -> bool {
        self.inner.values.read().holds(resource_id)
    }

    /// Store the raw bytes of a document
    pub fn insert_document(
        &self,
        resource_id: &str,
        data: impl Into<Arc<[u8]>>,
        tag: Option<ValidationTag>,
    ) {
        let data = data.into();
        let size = data.len();

        let mut store = self.inner.documents.write();
        store.blobs.insert(resource_id.to_string(), data);
        store.tags.insert(resource_id.to_string(), tag);

        tracing::debug!(resource_id, size, "Cached document");
    }

    pub fn fetch_document(&self, resource_id: &str) -> Option<Arc<[u8]>> {
        let data = self.inner.documents.read().blobs.get(resource_id).cloned();
        tracing::debug!(resource_id, hit = data.is_some(), "Document lookup");
        data
    }

    /// Whether the cached document of `resource_id` is current for `tag`
    ///
    /// Same semantics as [`ResourceCache::check_validity_values`].
    pub fn check_validity_document(&self, resource_id: &str, tag: Option<&ValidationTag>) -> bool {
        check_validity(&self.inner.documents, "document", resource_id, tag)
    }

    pub fn evict_document(&self, resource_id: &str) -> bool {
        let evicted = self.inner.documents.write().evict(resource_id);
        if evicted {
            tracing::debug!(resource_id, "Evicted document");
        }
        evicted
    }

    pub fn contains_document(&self, resource_id: &str) -> bool {
        self.inner.documents.read().holds(resource_id)
    }

    pub fn stats(&self) -> CacheStats {
        let (value_resources, cached_values) = {
            let store = self.inner.values.read();
            (store.root.len(), store.root.value_count())
        };
        let (documents, document_bytes) = {
            let store = self.inner.documents.read();
            (store.blobs.len(), store.blobs.values().map(|data| data.len()).sum())
        };

        CacheStats {
            value_resources,
            cached_values,
            documents,
            document_bytes,
        }
    }

    /// Drop everything from both stores
    pub fn clear(&self) {
        {
            let mut store = self.inner.values.write();
            store.root.clear();
            store.tags.clear();
        }
        {
            let mut store = self.inner.documents.write();
            store.blobs.clear();
            store.tags.clear();
        }
        tracing::info!("Cleared resource cache");
    }
}

/// Stored keys are concrete segments under the resource's own subtree
///
/// The kind's base segments name the resource and are never read as bulk
/// tokens, so they may contain the range delimiter.
fn validate_insert_path(
    resource_id: &str,
    segments: &[String],
    kind: DocumentKind,
    delimiter: RangeDelimiter,
) -> Result<()> {
    match segments.first() {
        Some(first) if first == resource_id => {}
        _ => {
            return Err(CacheError::InvalidReference(format!(
                "/{} is outside resource {}",
                segments.join("/"),
                resource_id
            )));
        }
    }

    if segments.len() < 2 {
        return Err(CacheError::InvalidReference(format!(
            "/{} has no sub-address",
            segments.join("/")
        )));
    }

    let base = kind.policy().base_segments;
    if let Some(token) = segments
        .iter()
        .skip(base)
        .find(|segment| is_bulk_token(segment, delimiter))
    {
        return Err(CacheError::InvalidReference(format!(
            "bulk token '{}' cannot be stored",
            token
        )));
    }

    Ok(())
}

fn check_validity<S: TaggedStore>(
    lock: &RwLock<S>,
    store: &'static str,
    resource_id: &str,
    tag: Option<&ValidationTag>,
) -> bool {
    {
        let guard = lock.read();
        if !guard.holds(resource_id) {
            return false;
        }
        if guard.is_current(resource_id, tag) {
            return true;
        }
    }

    revalidate(lock, store, resource_id, tag)
}

/// Re-check staleness under the write lock and evict if still stale
///
/// Another thread may have refreshed or evicted the resource since the read
/// lock was released.
fn revalidate<S: TaggedStore>(
    lock: &RwLock<S>,
    store: &'static str,
    resource_id: &str,
    tag: Option<&ValidationTag>,
) -> bool {
    let mut guard = lock.write();
    if guard.is_current(resource_id, tag) {
        tracing::debug!(resource_id, store, "Resource refreshed concurrently, skipping eviction");
        return true;
    }
    if guard.evict(resource_id) {
        tracing::info!(resource_id, store, "Evicted stale resource");
    }
    false
}
