use serde::Serialize;
use std::cell::{BorrowError, BorrowMutError, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Property name that marks a mapping as a reference pointer node.
pub const REF_KEY: &str = "$ref";

/// Ordered key/value pairs of a mapping node.
pub type Entries = Vec<(String, Node)>;

/// A node of a parsed document graph.
///
/// Containers are reference-counted handles: cloning a `Node` that holds a
/// mapping or sequence yields a second handle to the same container, which is
/// how a resolved value ends up shared between several locations.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Mapping(Rc<RefCell<Entries>>),
    Sequence(Rc<RefCell<Vec<Node>>>),
}

impl Node {
    /// Creates a new mapping node from ordered entries.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Node {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Node::Mapping(Rc::new(RefCell::new(entries)))
    }

    /// Creates a new sequence node.
    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Node {
        Node::Sequence(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Creates a reference pointer node, `{"$ref": pointer}`.
    pub fn ref_node(pointer: impl Into<String>) -> Node {
        Node::mapping([(REF_KEY, Node::String(pointer.into()))])
    }

    /// Returns a handle to this node's container, if it is one.
    pub fn as_container(&self) -> Option<Container> {
        match self {
            Node::Mapping(m) => Some(Container::Mapping(Rc::clone(m))),
            Node::Sequence(s) => Some(Container::Sequence(Rc::clone(s))),
            _ => None,
        }
    }

    /// Identity comparison. Two containers are the same node only if they
    /// are handles to one allocation; scalars never share identity.
    pub fn same(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Mapping(a), Node::Mapping(b)) => Rc::ptr_eq(a, b),
            (Node::Sequence(a), Node::Sequence(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Returns the pointer string if this node is a reference pointer node.
    ///
    /// A mapping whose `$ref` entry is not a string is an ordinary mapping.
    pub fn ref_pointer(&self) -> Option<String> {
        let Node::Mapping(m) = self else {
            return None;
        };
        let entries = m.try_borrow().ok()?;
        entries.iter().find_map(|(k, v)| match v {
            Node::String(s) if k == REF_KEY => Some(s.clone()),
            _ => None,
        })
    }

    /// Returns `true` if this node is a reference pointer node.
    pub fn is_ref(&self) -> bool {
        self.ref_pointer().is_some()
    }

    /// Looks up a mapping entry, returning a handle to its value.
    pub fn get(&self, key: &str) -> Option<Node> {
        let Node::Mapping(m) = self else {
            return None;
        };
        let entries = m.try_borrow().ok()?;
        entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    /// Looks up a sequence element, returning a handle to it.
    pub fn at(&self, index: usize) -> Option<Node> {
        let Node::Sequence(s) = self else {
            return None;
        };
        let items = s.try_borrow().ok()?;
        items.get(index).cloned()
    }

    /// Sets a mapping entry in place. An existing key keeps its position.
    ///
    /// Returns `false` if this node is not a mapping.
    pub fn insert(&self, key: impl Into<String>, value: Node) -> bool {
        let Node::Mapping(m) = self else {
            return false;
        };
        let Ok(mut entries) = m.try_borrow_mut() else {
            return false;
        };
        let key = key.into();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
        true
    }

    /// Appends to a sequence in place. Returns `false` if this node is not a
    /// sequence.
    pub fn push(&self, value: Node) -> bool {
        let Node::Sequence(s) = self else {
            return false;
        };
        let Ok(mut items) = s.try_borrow_mut() else {
            return false;
        };
        items.push(value);
        true
    }

    /// Number of entries or elements; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Node::Mapping(m) => m.try_borrow().map(|e| e.len()).unwrap_or(0),
            Node::Sequence(s) => s.try_borrow().map(|i| i.len()).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structural equality. Mapping comparison ignores entry order. Containers
/// that cannot be borrowed compare unequal unless they are the same handle.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (Ok(a), Ok(b)) = (a.try_borrow(), b.try_borrow()) else {
                    return false;
                };
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.iter().any(|(other_key, other_value)| {
                            key == other_key && value == other_value
                        })
                    })
            }
            (Node::Sequence(a), Node::Sequence(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                match (a.try_borrow(), b.try_borrow()) {
                    (Ok(a), Ok(b)) => *a == *b,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

/// Address of a property within its container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl Key {
    /// Returns this key as a JSON Pointer reference token.
    pub fn escaped(&self) -> String {
        match self {
            Key::Name(name) => crate::document::escape_token(name),
            Key::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A handle to a mapping or sequence node.
///
/// Accessors borrow the underlying cell only for the duration of the call, so
/// no borrow is ever held while a visitor runs.
#[derive(Debug, Clone)]
pub enum Container {
    Mapping(Rc<RefCell<Entries>>),
    Sequence(Rc<RefCell<Vec<Node>>>),
}

impl Container {
    /// Snapshot of the container's keys: mapping keys in insertion order,
    /// sequence indices ascending.
    pub fn keys(&self) -> Result<Vec<Key>, BorrowError> {
        match self {
            Container::Mapping(m) => Ok(m
                .try_borrow()?
                .iter()
                .map(|(k, _)| Key::Name(k.clone()))
                .collect()),
            Container::Sequence(s) => Ok((0..s.try_borrow()?.len()).map(Key::Index).collect()),
        }
    }

    /// Reads the current value stored at `key`.
    pub fn get(&self, key: &Key) -> Result<Option<Node>, BorrowError> {
        match (self, key) {
            (Container::Mapping(m), Key::Name(name)) => Ok(m
                .try_borrow()?
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())),
            (Container::Sequence(s), Key::Index(i)) => Ok(s.try_borrow()?.get(*i).cloned()),
            _ => Ok(None),
        }
    }

    /// Overwrites the value at an existing `key`. Returns `false` if the key
    /// is not present.
    pub fn set(&self, key: &Key, value: Node) -> Result<bool, BorrowMutError> {
        match (self, key) {
            (Container::Mapping(m), Key::Name(name)) => {
                let mut entries = m.try_borrow_mut()?;
                match entries.iter_mut().find(|(k, _)| k == name) {
                    Some(slot) => {
                        slot.1 = value;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            (Container::Sequence(s), Key::Index(i)) => {
                let mut items = s.try_borrow_mut()?;
                match items.get_mut(*i) {
                    Some(slot) => {
                        *slot = value;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    /// Returns `true` if `node` is a handle to this very container.
    pub fn is(&self, node: &Node) -> bool {
        match (self, node) {
            (Container::Mapping(a), Node::Mapping(b)) => Rc::ptr_eq(a, b),
            (Container::Sequence(a), Node::Sequence(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Mapping from pointer string to an already-resolved target node.
///
/// Built by whatever resolved the document's pointers; the dereferencer only
/// ever reads it.
#[derive(Debug, Clone, Default)]
pub struct PointerTable {
    entries: HashMap<String, Node>,
}

impl PointerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the target for `pointer`, returning the previous one.
    pub fn insert(&mut self, pointer: impl Into<String>, target: Node) -> Option<Node> {
        self.entries.insert(pointer.into(), target)
    }

    pub fn get(&self, pointer: &str) -> Option<&Node> {
        self.entries.get(pointer)
    }

    pub fn contains(&self, pointer: &str) -> bool {
        self.entries.contains_key(pointer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the pointer strings in the table, in no particular order.
    pub fn pointers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for PointerTable {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Summary of a completed dereference pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerefStats {
    /// Number of pointer nodes replaced by their targets.
    pub resolved: usize,
    /// Locations of pointer nodes left in place because replacing them
    /// would have been circular.
    pub circular_paths: Vec<String>,
    /// Locations of pointer nodes whose pointer had no table entry.
    pub missing_paths: Vec<String>,
    /// `true` when dereferencing was disabled and nothing was traversed.
    pub skipped: bool,
}

impl DerefStats {
    /// Converts a non-empty circular list into the circular-reference error.
    pub fn into_result(self) -> crate::errors::Result<DerefStats> {
        if self.circular_paths.is_empty() {
            return Ok(self);
        }
        Err(crate::errors::DerefError::CircularReferences {
            count: self.circular_paths.len(),
            paths: self.circular_paths,
        })
    }
}
