use std::fs;
use std::path::Path;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::errors::{DerefError, Result};
use crate::graph::{Crawler, Descend, Site};
use crate::types::{Node, PointerTable};

/// Escapes a property name for use as a JSON Pointer reference token
/// (`~` becomes `~0`, `/` becomes `~1`).
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Reverses [`escape_token`].
pub fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Node::Null,
            serde_json::Value::Bool(b) => Node::Bool(b),
            serde_json::Value::Number(n) => Node::Number(n),
            serde_json::Value::String(s) => Node::String(s),
            serde_json::Value::Array(items) => Node::sequence(items.into_iter().map(Node::from)),
            serde_json::Value::Object(map) => {
                Node::mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))))
            }
        }
    }
}

/// Shared subtrees are written out in full at every location that holds them.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Mapping(m) => {
                let entries = m.try_borrow().map_err(S::Error::custom)?;
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Sequence(s) => {
                let items = s.try_borrow().map_err(S::Error::custom)?;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Node::from)
    }
}

impl Node {
    /// Converts this node into a `serde_json::Value`, copying shared subtrees.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns a handle to the node addressed by a JSON Pointer.
    ///
    /// Accepts both the plain form (`/definitions/Pet`) and the URI fragment
    /// form (`#/definitions/Pet`). An empty pointer addresses `self`.
    pub fn pointer(&self, pointer: &str) -> Option<Node> {
        let path = pointer.strip_prefix('#').unwrap_or(pointer);
        if path.is_empty() {
            return Some(self.clone());
        }

        let path = path.strip_prefix('/')?;
        let mut current = self.clone();
        for token in path.split('/') {
            let token = unescape_token(token);
            let next = match &current {
                Node::Mapping(_) => current.get(&token)?,
                Node::Sequence(_) => current.at(token.parse().ok()?)?,
                _ => return None,
            };
            current = next;
        }
        Some(current)
    }
}

/// Lists every reference pointer node reachable from `root` as
/// `(location, pointer)` pairs, in traversal order.
///
/// After dereferencing, anything listed here is either circular or had no
/// table entry.
pub fn find_pointers(root: &Node) -> Result<Vec<(String, String)>> {
    let mut found = Vec::new();
    Crawler::new().crawl(root, |site: &Site<'_>| {
        if let Some(pointer) = site.value()?.ref_pointer() {
            found.push((site.path().to_string(), pointer));
            return Ok(Descend::Skip);
        }
        Ok(Descend::Into)
    })?;
    Ok(found)
}

/// Reads and parses a JSON document from disk.
pub fn load_json(path: &Path) -> Result<Node> {
    let contents = fs::read_to_string(path).map_err(|e| DerefError::File {
        message: format!("failed to read file: {}", e),
        path: path.display().to_string(),
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| DerefError::Parse {
            message: e.to_string(),
            path: path.display().to_string(),
        })?;

    Ok(Node::from(value))
}

/// Reads a pointer table from a JSON object mapping pointer strings to
/// their resolved values.
pub fn load_table(path: &Path) -> Result<PointerTable> {
    let node = load_json(path)?;
    let Node::Mapping(entries) = node else {
        return Err(DerefError::Parse {
            message: "pointer table must be a JSON object".to_string(),
            path: path.display().to_string(),
        });
    };

    let table = entries
        .try_borrow()
        .map_err(|e| DerefError::Parse {
            message: e.to_string(),
            path: path.display().to_string(),
        })?
        .iter()
        .map(|(pointer, target)| (pointer.clone(), target.clone()))
        .collect();
    Ok(table)
}
