//! Path identifier types
//!
//! Paths are immutable and compared structurally. Wildcard segments carry
//! no key; concrete segments address one entry of a list-typed node.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar value usable as a list-entry key.
///
/// Restricted to hashable scalars so paths can serve as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl KeyValue {
    /// The JSON representation used when matching list entries.
    pub fn to_json(&self) -> Value {
        match self {
            KeyValue::String(s) => Value::String(s.clone()),
            KeyValue::Integer(i) => Value::from(*i),
            KeyValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::String(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::String(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Integer(value)
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        KeyValue::Bool(value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::String(s) => write!(f, "{}", s),
            KeyValue::Integer(i) => write!(f, "{}", i),
            KeyValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Discriminating key of a list entry: the name of the key field plus its
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    field: String,
    value: KeyValue,
}

impl Key {
    pub fn new(field: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Name of the field holding the key inside a list entry.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &KeyValue {
        &self.value
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

/// One step of a path: the node type name, optionally narrowed to a single
/// list entry by a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    node_type: String,
    key: Option<Key>,
}

impl PathSegment {
    pub fn wildcard(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            key: None,
        }
    }

    pub fn keyed(node_type: impl Into<String>, key: Key) -> Self {
        Self {
            node_type: node_type.into(),
            key: Some(key),
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Same segment with the key stripped.
    pub fn wildcarded(&self) -> PathSegment {
        PathSegment {
            node_type: self.node_type.clone(),
            key: None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}[{}]", self.node_type, key),
            None => write!(f, "{}", self.node_type),
        }
    }
}

/// Structured address of a node in the schema tree.
///
/// Built root-first: `PathId::root("device").child("interfaces")`.
/// Equality is structural; two paths with the same types but different keys
/// are different paths, while [`PathId::wildcarded`] compares shapes only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId {
    segments: Vec<PathSegment>,
}

impl PathId {
    /// A one-segment path; always a root candidate in the hierarchy.
    pub fn root(node_type: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::wildcard(node_type)],
        }
    }

    /// Append a wildcard (type-only) segment.
    pub fn child(mut self, node_type: impl Into<String>) -> Self {
        self.segments.push(PathSegment::wildcard(node_type));
        self
    }

    /// Append a concrete segment addressing one list entry.
    pub fn keyed_child(mut self, node_type: impl Into<String>, key: Key) -> Self {
        self.segments.push(PathSegment::keyed(node_type, key));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Type name of the node this path addresses (last segment).
    pub fn node_type(&self) -> &str {
        self.last_segment().node_type()
    }

    pub fn last_segment(&self) -> &PathSegment {
        self.segments.last().expect("path has at least one segment")
    }

    /// Same path with every key stripped; the shape used for routing and
    /// hierarchy membership.
    pub fn wildcarded(&self) -> PathId {
        PathId {
            segments: self.segments.iter().map(PathSegment::wildcarded).collect(),
        }
    }

    /// All leading sub-paths, shortest first, up to and including the whole
    /// path.
    pub fn prefixes(&self) -> impl Iterator<Item = PathId> + '_ {
        (1..=self.segments.len()).map(move |len| self.prefix(len))
    }

    /// Leading sub-path of the given length, keys preserved.
    pub fn prefix(&self, len: usize) -> PathId {
        assert!(len >= 1 && len <= self.segments.len());
        PathId {
            segments: self.segments[..len].to_vec(),
        }
    }

    /// Whether this path's shape begins with the other path's shape
    /// (keys are ignored on both sides).
    pub fn starts_with(&self, other: &PathId) -> bool {
        other.segments.len() <= self.segments.len()
            && other
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(a, b)| a.node_type() == b.node_type())
    }

    /// Key of the first segment with the given node type, if any.
    pub fn first_key_of(&self, node_type: &str) -> Option<&Key> {
        self.segments
            .iter()
            .find(|s| s.node_type() == node_type)
            .and_then(|s| s.key())
    }

    /// Same path with the last segment narrowed to the given key.
    pub fn with_last_key(&self, key: Key) -> PathId {
        let mut segments = self.segments.clone();
        let last = segments.pop().expect("path has at least one segment");
        segments.push(PathSegment::keyed(last.node_type().to_string(), key));
        PathId { segments }
    }

    /// This path extended by the last segment of a child's wildcard path.
    pub fn join_last(&self, child: &PathId) -> PathId {
        let mut segments = self.segments.clone();
        segments.push(child.last_segment().wildcarded());
        PathId { segments }
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth0() -> Key {
        Key::new("name", "eth0")
    }

    #[test]
    fn test_display() {
        let path = PathId::root("device").keyed_child("interfaces", eth0());
        assert_eq!(path.to_string(), "/device/interfaces[name=eth0]");
    }

    #[test]
    fn test_wildcarded_strips_keys() {
        let concrete = PathId::root("device").keyed_child("interfaces", eth0());
        let wild = PathId::root("device").child("interfaces");
        assert_ne!(concrete, wild);
        assert_eq!(concrete.wildcarded(), wild);
    }

    #[test]
    fn test_starts_with_ignores_keys() {
        let concrete = PathId::root("device")
            .keyed_child("interfaces", eth0())
            .child("statistics");
        let prefix = PathId::root("device").child("interfaces");
        assert!(concrete.starts_with(&prefix));
        assert!(!prefix.starts_with(&concrete));
    }

    #[test]
    fn test_prefixes_shortest_first() {
        let path = PathId::root("a").child("b").child("c");
        let prefixes: Vec<String> = path.prefixes().map(|p| p.to_string()).collect();
        assert_eq!(prefixes, vec!["/a", "/a/b", "/a/b/c"]);
    }

    #[test]
    fn test_first_key_of() {
        let path = PathId::root("device")
            .keyed_child("interfaces", eth0())
            .child("statistics");
        assert_eq!(path.first_key_of("interfaces"), Some(&eth0()));
        assert_eq!(path.first_key_of("statistics"), None);
        assert_eq!(path.first_key_of("missing"), None);
    }

    #[test]
    fn test_with_last_key() {
        let wild = PathId::root("device").child("interfaces");
        let keyed = wild.with_last_key(eth0());
        assert_eq!(keyed.last_segment().key(), Some(&eth0()));
        assert_eq!(keyed.wildcarded(), wild);
    }

    #[test]
    fn test_join_last() {
        let parent = PathId::root("device").keyed_child("interfaces", eth0());
        let child_type = PathId::root("device").child("interfaces").child("statistics");
        let joined = parent.join_last(&child_type);
        assert_eq!(
            joined.to_string(),
            "/device/interfaces[name=eth0]/statistics"
        );
    }

    #[test]
    fn test_key_value_json() {
        assert_eq!(KeyValue::from("eth0").to_json(), serde_json::json!("eth0"));
        assert_eq!(KeyValue::from(7i64).to_json(), serde_json::json!(7));
        assert_eq!(KeyValue::from(true).to_json(), serde_json::json!(true));
    }
}
