//! Cache tree nodes
//!
//! Each node maps path segments to children in segment order (see
//! `path::compare_segments`). A child is either a leaf value or another
//! node; one key never holds both.

use std::collections::BTreeMap;

use crate::error::{CacheError, Result};
use crate::path::{ordered_bounds, SegmentKey};

use super::types::{Payload, Value};

/// A leaf as stored in the tree (its address is implied by its position)
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue {
    pub type_tag: String,
    pub value: Payload,
}

impl CachedValue {
    pub fn new(value: Payload, type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            value,
        }
    }

    /// Copy this leaf out of the tree under the given sub-address
    pub fn to_value(&self, sub_uri: String) -> Value {
        Value {
            sub_uri,
            type_tag: self.type_tag.clone(),
            value: self.value.clone(),
        }
    }
}

/// Child of a tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Value(CachedValue),
    Node(TreeNode),
}

impl Child {
    pub fn as_node(&self) -> Option<&TreeNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&CachedValue> {
        match self {
            Child::Value(value) => Some(value),
            Child::Node(_) => None,
        }
    }
}

/// Node of the value cache tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    children: BTreeMap<SegmentKey, Child>,
}

impl TreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the child at `key`, returning the previous one
    pub fn put(&mut self, key: &str, child: Child) -> Option<Child> {
        self.children.insert(SegmentKey::from(key), child)
    }

    pub fn get(&self, key: &str) -> Option<&Child> {
        self.children.get(&SegmentKey::from(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.children.contains_key(&SegmentKey::from(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<Child> {
        self.children.remove(&SegmentKey::from(key))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// All keys in segment order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(SegmentKey::as_str)
    }

    /// All children in segment order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Child)> {
        self.children.iter().map(|(key, child)| (key.as_str(), child))
    }

    /// Children whose keys fall between `lo` and `hi`, both inclusive
    ///
    /// Bounds given in reverse order are swapped.
    pub fn range(&self, lo: &str, hi: &str) -> impl Iterator<Item = (&str, &Child)> {
        let (lo, hi) = ordered_bounds(lo, hi);
        self.children
            .range(SegmentKey::from(lo)..=SegmentKey::from(hi))
            .map(|(key, child)| (key.as_str(), child))
    }

    /// Keys between `lo` and `hi`, both inclusive
    pub fn keys_in_range(&self, lo: &str, hi: &str) -> impl Iterator<Item = &str> {
        self.range(lo, hi).map(|(key, _)| key)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.children.keys().next().map(SegmentKey::as_str)
    }

    pub fn last_key(&self) -> Option<&str> {
        self.children.keys().next_back().map(SegmentKey::as_str)
    }

    /// Store `leaf` at `path`, creating intermediate nodes as needed
    ///
    /// A value at the last segment is overwritten. Fails if an intermediate
    /// segment already holds a value or the last segment holds a subtree.
    pub fn insert_path<S: AsRef<str>>(&mut self, path: &[S], leaf: CachedValue) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            return Err(CacheError::InvalidChild("empty path".to_string()));
        };

        let mut node = self;
        for (depth, segment) in parents.iter().enumerate() {
            let segment = segment.as_ref();
            let child = node
                .children
                .entry(SegmentKey::from(segment))
                .or_insert_with(|| Child::Node(TreeNode::new()));

            node = match child {
                Child::Node(next) => next,
                Child::Value(_) => {
                    return Err(CacheError::InvalidChild(format!(
                        "segment '{}' at depth {} holds a value, cannot descend into it",
                        segment, depth
                    )));
                }
            };
        }

        let last = last.as_ref();
        if let Some(Child::Node(_)) = node.get(last) {
            return Err(CacheError::InvalidChild(format!(
                "segment '{}' at depth {} holds a subtree, cannot replace it with a value",
                last,
                parents.len()
            )));
        }

        node.put(last, Child::Value(leaf));
        Ok(())
    }

    /// Whether `path` leads from this node to an existing child
    pub fn contains_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let mut node = self;
        for (i, segment) in path.iter().enumerate() {
            match node.get(segment.as_ref()) {
                Some(Child::Node(next)) => node = next,
                Some(Child::Value(_)) => return i + 1 == path.len(),
                None => return false,
            }
        }
        true
    }

    /// Path of the first key where merging `other` would put a subtree over a
    /// value or a value over a subtree, if any
    pub fn merge_conflict(&self, other: &TreeNode) -> Option<String> {
        for (key, theirs) in &other.children {
            match (self.children.get(key), theirs) {
                (Some(Child::Value(_)), Child::Node(_))
                | (Some(Child::Node(_)), Child::Value(_)) => return Some(key.to_string()),
                (Some(Child::Node(mine)), Child::Node(theirs)) => {
                    if let Some(path) = mine.merge_conflict(theirs) {
                        return Some(format!("{}/{}", key, path));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Move every child of `other` into this node
    ///
    /// Subtrees present on both sides are merged recursively; anything else
    /// from `other` replaces what was there. Check `merge_conflict` first.
    pub fn merge(&mut self, other: TreeNode) {
        for (key, theirs) in other.children {
            let theirs = match theirs {
                Child::Node(subtree) => match self.children.get_mut(&key) {
                    Some(Child::Node(mine)) => {
                        mine.merge(subtree);
                        continue;
                    }
                    _ => Child::Node(subtree),
                },
                leaf => leaf,
            };
            self.children.insert(key, theirs);
        }
    }

    /// Number of leaf values in this subtree
    pub fn value_count(&self) -> usize {
        self.children
            .values()
            .map(|child| match child {
                Child::Value(_) => 1,
                Child::Node(node) => node.value_count(),
            })
            .sum()
    }
}
