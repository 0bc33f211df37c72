//! Cache value types
//!
//! Values enter the cache as a `ValueBatch` (sub-addresses relative to a
//! base URI) and leave it as a `ValueList` whose sub-addresses are relative
//! to the start node of the query that produced it.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Typed scalar extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Boolean(bool),
    Number(f64),
    DateTime(DateTime<FixedOffset>),
    Text(String),
}

impl Payload {
    /// Empty strings carry no information and are dropped from results
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Text(text) if text.is_empty())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Boolean(value) => write!(f, "{}", value),
            Payload::Number(value) => write!(f, "{}", value),
            Payload::DateTime(value) => write!(f, "{}", value.to_rfc3339()),
            Payload::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<f64> for Payload {
    fn from(number: f64) -> Self {
        Payload::Number(number)
    }
}

impl From<bool> for Payload {
    fn from(flag: bool) -> Self {
        Payload::Boolean(flag)
    }
}

impl From<DateTime<FixedOffset>> for Payload {
    fn from(time: DateTime<FixedOffset>) -> Self {
        Payload::DateTime(time)
    }
}

/// A cached value as returned by a fetch
///
/// `sub_uri` is recomputed for every response; it is only meaningful
/// together with the `base_uri` of the enclosing `ValueList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub sub_uri: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Payload,
}

/// Result of a fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueList {
    /// Prefix consumed before bulk traversal, with leading and trailing `/`
    pub base_uri: String,
    pub values: Vec<Value>,
}

impl ValueList {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(sub_uri, payload)` pairs, mostly useful in tests and logs
    pub fn entries(&self) -> Vec<(&str, &Payload)> {
        self.values
            .iter()
            .map(|value| (value.sub_uri.as_str(), &value.value))
            .collect()
    }
}

/// One value of an insert batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueItem {
    pub sub_uri: Option<String>,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Payload,
}

impl ValueItem {
    pub fn new(
        sub_uri: impl Into<String>,
        value: impl Into<Payload>,
        type_tag: impl Into<String>,
    ) -> Self {
        Self {
            sub_uri: Some(sub_uri.into()),
            type_tag: type_tag.into(),
            value: value.into(),
        }
    }
}

/// Values extracted from one resource, addressed relative to `base_uri`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBatch {
    pub base_uri: String,
    pub items: Vec<ValueItem>,
}

impl ValueBatch {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            items: Vec::new(),
        }
    }

    /// Append a string value (`xs:string`)
    pub fn text(mut self, sub_uri: &str, text: &str) -> Self {
        self.items.push(ValueItem::new(sub_uri, text, "xs:string"));
        self
    }

    pub fn push(&mut self, item: ValueItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Opaque token identifying one version of a source document
///
/// Plays the role of an HTTP entity tag. Two tags match only if both the
/// value and the weak flag are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationTag {
    pub value: String,
    pub weak: bool,
}

impl ValidationTag {
    pub fn strong(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            weak: false,
        }
    }

    pub fn weak(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            weak: true,
        }
    }

    /// Tag derived from the modification time of a resource's source file
    pub fn from_modified(resource_id: &str, modified: SystemTime) -> Self {
        let millis = modified
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or(0);
        Self::strong(format!("{}_{}", resource_id, millis))
    }

    /// Tag derived from the bytes of a source document (SHA-256, hex)
    pub fn from_content(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self::strong(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ValidationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            write!(f, "W/\"{}\"", self.value)
        } else {
            write!(f, "\"{}\"", self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_payload_empty() {
        assert!(Payload::from("").is_empty());
        assert!(!Payload::from("x").is_empty());
        assert!(!Payload::from(0.0).is_empty());
    }

    #[test]
    fn test_payload_display() {
        assert_eq!(Payload::from(true).to_string(), "true");
        assert_eq!(Payload::from(2.5).to_string(), "2.5");
        assert_eq!(Payload::from("w").to_string(), "w");
    }

    #[test]
    fn test_value_serialization() {
        let value = Value {
            sub_uri: "B1".to_string(),
            type_tag: "xs:string".to_string(),
            value: Payload::from("y"),
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["subUri"], "B1");
        assert_eq!(json["type"], "xs:string");
        assert_eq!(json["value"], "y");
    }

    #[test]
    fn test_payload_deserialization() {
        let number: Payload = serde_json::from_str("42.0").unwrap();
        assert_eq!(number, Payload::Number(42.0));

        let flag: Payload = serde_json::from_str("false").unwrap();
        assert_eq!(flag, Payload::Boolean(false));

        let time: Payload = serde_json::from_str("\"2014-03-01T12:00:00+01:00\"").unwrap();
        assert!(matches!(time, Payload::DateTime(_)));

        let text: Payload = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, Payload::from("hello"));
    }

    #[test]
    fn test_batch_builder() {
        let batch = ValueBatch::new("/CsvTest/").text("A1", "x").text("B1", "y");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.items[1].sub_uri.as_deref(), Some("B1"));
        assert_eq!(batch.items[1].type_tag, "xs:string");
    }

    #[test]
    fn test_tag_from_modified() {
        let modified = UNIX_EPOCH + Duration::from_millis(1_400_000_000_123);
        let tag = ValidationTag::from_modified("CsvTest", modified);
        assert_eq!(tag.value, "CsvTest_1400000000123");
        assert!(!tag.weak);
    }

    #[test]
    fn test_tag_from_content() {
        let a = ValidationTag::from_content(b"a,b\nc,d\n");
        let b = ValidationTag::from_content(b"a,b\nc,d\n");
        let c = ValidationTag::from_content(b"a,b\nc,e\n");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.value.len(), 64);
    }

    #[test]
    fn test_tag_weakness_matters() {
        assert_ne!(ValidationTag::strong("v1"), ValidationTag::weak("v1"));
        assert_eq!(ValidationTag::weak("v1").to_string(), "W/\"v1\"");
        assert_eq!(ValidationTag::strong("v1").to_string(), "\"v1\"");
    }
}
