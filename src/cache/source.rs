//! Source traits
//!
//! Format handlers implement these to let the cache decide when a document
//! has to be parsed again. Extraction always runs outside the cache locks.

use std::sync::Arc;

use crate::error::Result;
use crate::path::DocumentKind;

use super::resource::ResourceCache;
use super::types::{ValidationTag, ValueBatch, ValueList};

/// Extracts the values of one resource from its source document
pub trait ValueSource: Send + Sync {
    /// Resource id, the first segment of every cached path
    fn resource_id(&self) -> &str;

    fn kind(&self) -> DocumentKind;

    /// Tag of the current source version, `None` if the source cannot tell
    fn validation_tag(&self) -> Option<ValidationTag>;

    /// Extract every value of the resource
    fn extract(&self) -> Result<ValueBatch>;
}

/// Loads the raw bytes of one resource
pub trait DocumentSource: Send + Sync {
    fn resource_id(&self) -> &str;

    fn validation_tag(&self) -> Option<ValidationTag>;

    fn load(&self) -> Result<Vec<u8>>;
}

impl ResourceCache {
    /// Answer `uri` from the cache, extracting from `source` when the cached
    /// values are stale, absent, or do not cover the query
    ///
    /// A query that still misses after a fresh extraction is `NotFound`.
    pub fn fetch_or_load(&self, uri: &str, source: &dyn ValueSource) -> Result<ValueList> {
        let resource_id = source.resource_id();
        let kind = source.kind();
        let tag = source.validation_tag();

        if self.check_validity_values(resource_id, tag.as_ref()) {
            match self.fetch_values(uri, kind) {
                Err(e) if e.is_cache_miss() => {
                    tracing::debug!(resource_id, uri, "Cache miss on valid resource");
                }
                result => return result,
            }
        }

        tracing::debug!(resource_id, kind = %kind, "Extracting values from source");
        let batch = source.extract()?;
        self.insert_values(resource_id, tag, &batch, kind)?;
        self.fetch_values(uri, kind)
    }

    /// Cached bytes of `source`'s resource, loading them when stale or absent
    pub fn fetch_or_load_document(&self, source: &dyn DocumentSource) -> Result<Arc<[u8]>> {
        let resource_id = source.resource_id();
        let tag = source.validation_tag();

        if self.check_validity_document(resource_id, tag.as_ref()) {
            if let Some(data) = self.fetch_document(resource_id) {
                return Ok(data);
            }
        }

        let data: Arc<[u8]> = source.load()?.into();
        self.insert_document(resource_id, Arc::clone(&data), tag);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CsvSource {
        tag: Mutex<Option<ValidationTag>>,
        rows: Mutex<Vec<(&'static str, &'static str)>>,
        extractions: AtomicUsize,
    }

    impl CsvSource {
        fn new(tag: Option<&str>) -> Self {
            Self {
                tag: Mutex::new(tag.map(ValidationTag::strong)),
                rows: Mutex::new(vec![("A1", "x"), ("B1", "y"), ("A2", "z"), ("B2", "w")]),
                extractions: AtomicUsize::new(0),
            }
        }

        fn extractions(&self) -> usize {
            self.extractions.load(Ordering::SeqCst)
        }
    }

    impl ValueSource for CsvSource {
        fn resource_id(&self) -> &str {
            "CsvTest"
        }

        fn kind(&self) -> DocumentKind {
            DocumentKind::Csv
        }

        fn validation_tag(&self) -> Option<ValidationTag> {
            self.tag.lock().clone()
        }

        fn extract(&self) -> Result<ValueBatch> {
            self.extractions.fetch_add(1, Ordering::SeqCst);
            let batch = self
                .rows
                .lock()
                .iter()
                .fold(ValueBatch::new("/CsvTest/"), |batch, (sub, text)| batch.text(sub, text));
            Ok(batch)
        }
    }

    struct BrokenSource;

    impl ValueSource for BrokenSource {
        fn resource_id(&self) -> &str {
            "Broken"
        }

        fn kind(&self) -> DocumentKind {
            DocumentKind::Csv
        }

        fn validation_tag(&self) -> Option<ValidationTag> {
            None
        }

        fn extract(&self) -> Result<ValueBatch> {
            Err(CacheError::Extraction("unexpected end of file".to_string()))
        }
    }

    struct PdfBytes {
        data: &'static [u8],
        loads: AtomicUsize,
    }

    impl DocumentSource for PdfBytes {
        fn resource_id(&self) -> &str {
            "Paper"
        }

        fn validation_tag(&self) -> Option<ValidationTag> {
            Some(ValidationTag::from_content(self.data))
        }

        fn load(&self) -> Result<Vec<u8>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.to_vec())
        }
    }

    #[test]
    fn test_extracts_once() {
        let cache = ResourceCache::default();
        let source = CsvSource::new(Some("T1"));

        let first = cache.fetch_or_load("/CsvTest/B*", &source).unwrap();
        let second = cache.fetch_or_load("/CsvTest/*2", &source).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.values[0].sub_uri, "A2");
        assert_eq!(source.extractions(), 1);
    }

    #[test]
    fn test_reextracts_on_new_tag() {
        let cache = ResourceCache::default();
        let source = CsvSource::new(Some("T1"));
        cache.fetch_or_load("/CsvTest/A1", &source).unwrap();

        *source.tag.lock() = Some(ValidationTag::strong("T2"));
        *source.rows.lock() = vec![("A1", "changed")];

        let list = cache.fetch_or_load("/CsvTest/*", &source).unwrap();
        assert_eq!(source.extractions(), 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list.values[0].value.to_string(), "changed");
    }

    #[test]
    fn test_absent_point_after_extraction() {
        let cache = ResourceCache::default();
        let source = CsvSource::new(None);

        let result = cache.fetch_or_load("/CsvTest/C1", &source);
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert_eq!(source.extractions(), 1);
        assert!(cache.contains_values("CsvTest"));
    }

    #[test]
    fn test_extraction_errors_propagate() {
        let cache = ResourceCache::default();
        let result = cache.fetch_or_load("/Broken/*", &BrokenSource);
        assert!(matches!(result, Err(CacheError::Extraction(_))));
        assert!(!cache.contains_values("Broken"));
    }

    #[test]
    fn test_document_loaded_once() {
        let cache = ResourceCache::default();
        let source = PdfBytes {
            data: b"%PDF-1.4",
            loads: AtomicUsize::new(0),
        };

        let first = cache.fetch_or_load_document(&source).unwrap();
        let second = cache.fetch_or_load_document(&source).unwrap();

        assert_eq!(&first[..], b"%PDF-1.4");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }
}
