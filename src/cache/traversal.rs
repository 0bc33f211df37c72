//! Start-node resolution and bulk traversal
//!
//! A query is answered in two steps:
//!
//! 1. `resolve_start` walks the fixed, non-bulk prefix of the canonical path
//!    and returns the node where branching begins, together with the
//!    consumed prefix as a base URI.
//! 2. `traverse` walks the remaining segments from that node, branching at
//!    every wildcard or range token, and collects the matching leaves with
//!    their paths relative to the start node.
//!
//! Both are pure functions over a borrowed tree; the caller holds the lock.

use crate::error::{CacheError, Result};
use crate::path::{is_bulk_token, split_range, DocumentKind, RangeDelimiter, WILDCARD};

use super::node::{CachedValue, Child, TreeNode};

/// Node from which bulk traversal starts
#[derive(Debug)]
pub struct StartNode<'a> {
    pub node: &'a TreeNode,
    /// Consumed prefix, e.g. `/CsvTest/`
    pub base_uri: String,
    /// Number of leading segments consumed
    pub consumed: usize,
}

/// A leaf matched by a traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    /// Keys from the start node down to the leaf
    pub path: Vec<&'a str>,
    pub value: &'a CachedValue,
}

/// Walk the non-bulk prefix of `segments` starting at `root`
///
/// A segment is consumed while it lies within the kind's base segments, or
/// while it is not a bulk token and the segments left still exceed the
/// kind's sub-address length. Every consumed segment must exist.
///
/// When the remaining segments contain no bulk token the query names a
/// single point; the full point is checked here so that a missing value is
/// reported as `NotFound` rather than as an empty result.
pub fn resolve_start<'a, S: AsRef<str>>(
    root: &'a TreeNode,
    segments: &[S],
    kind: DocumentKind,
    delimiter: RangeDelimiter,
) -> Result<StartNode<'a>> {
    let policy = kind.policy();
    let sub_address_start = segments.len().saturating_sub(policy.sub_segments);

    let mut node = root;
    let mut base_uri = String::from("/");
    let mut consumed = 0;

    for (i, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        let fixed = i < policy.base_segments;
        let exact = !is_bulk_token(segment, delimiter) && i < sub_address_start;
        if !(fixed || exact) {
            break;
        }

        match node.get(segment) {
            Some(Child::Node(next)) => node = next,
            Some(Child::Value(_)) => {
                return Err(CacheError::CorruptCache(format!(
                    "{}{} is a value, expected a subtree",
                    base_uri, segment
                )));
            }
            None => {
                return Err(CacheError::NotFound(format!("{}{}", base_uri, segment)));
            }
        }

        base_uri.push_str(segment);
        base_uri.push('/');
        consumed = i + 1;
    }

    let remaining = &segments[consumed..];
    let point_query = !remaining
        .iter()
        .any(|segment| is_bulk_token(segment.as_ref(), delimiter));
    if point_query && !node.contains_path(remaining) {
        let missing: Vec<&str> = remaining.iter().map(AsRef::as_ref).collect();
        return Err(CacheError::NotFound(format!("{}{}", base_uri, missing.join("/"))));
    }

    Ok(StartNode {
        node,
        base_uri,
        consumed,
    })
}

/// Collect every leaf below `node` matched by `segments`
///
/// Results come out in segment order at every level, so identical trees
/// and queries always produce identical output.
pub fn traverse<'a, S: AsRef<str>>(
    node: &'a TreeNode,
    segments: &[S],
    delimiter: RangeDelimiter,
) -> Vec<Hit<'a>> {
    let mut hits = Vec::new();
    let mut prefix = Vec::with_capacity(segments.len());
    collect(node, segments, 0, &mut prefix, delimiter, &mut hits);
    hits
}

fn collect<'a, S: AsRef<str>>(
    node: &'a TreeNode,
    segments: &[S],
    index: usize,
    prefix: &mut Vec<&'a str>,
    delimiter: RangeDelimiter,
    hits: &mut Vec<Hit<'a>>,
) {
    let Some(segment) = segments.get(index) else {
        return;
    };
    let segment = segment.as_ref();

    // A plain segment is a range of one key
    let (lo, hi) = if segment == WILDCARD {
        match (node.first_key(), node.last_key()) {
            (Some(first), Some(last)) => (first, last),
            _ => return,
        }
    } else {
        split_range(segment, delimiter).unwrap_or((segment, segment))
    };

    for (key, child) in node.range(lo, hi) {
        prefix.push(key);
        match child {
            Child::Value(value) => hits.push(Hit {
                path: prefix.clone(),
                value,
            }),
            Child::Node(next) => collect(next, segments, index + 1, prefix, delimiter, hits),
        }
        prefix.pop();
    }
}
