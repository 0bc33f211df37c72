//! Segment Ordering
//!
//! Path segments sort by length first, then lexicographically. Stored keys
//! are always canonical tokens from a narrow alphabet (row numbers without
//! leading zeros, uppercase column letters), so this order coincides with
//! numeric order for rows and with spreadsheet order for columns:
//!
//! ```text
//! "9" < "10" < "99" < "100"
//! "Z" < "AA" < "AZ" < "BA"
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Compare two path segments by length, then by byte order
pub fn compare_segments(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// A path segment used as a key in the cache tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentKey(String);

impl SegmentKey {
    pub fn new(segment: impl Into<String>) -> Self {
        Self(segment.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Ord for SegmentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_segments(&self.0, &other.0)
    }
}

impl PartialOrd for SegmentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for SegmentKey {
    fn from(segment: &str) -> Self {
        Self(segment.to_string())
    }
}

impl From<String> for SegmentKey {
    fn from(segment: String) -> Self {
        Self(segment)
    }
}

impl AsRef<str> for SegmentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// NOTE: no `Borrow<str>` impl. `str` orders lexicographically, which would
// make lookups by `&str` disagree with the tree order.

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return `(lo, hi)` ordered so that `lo <= hi` under the segment order
pub fn ordered_bounds<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if compare_segments(a, b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}
