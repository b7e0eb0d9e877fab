use crate::errors::{DerefError, Result};
use crate::types::{Container, Key, Node};

/// Visitor verdict for a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    /// Descend into whatever value the property holds once the visitor returns.
    Into,
    /// Leave the property's subtree alone and move on to the next sibling.
    Skip,
}

/// One (container, key) pair, as handed to a visitor.
pub struct Site<'a> {
    ancestors: &'a [Container],
    container: &'a Container,
    key: &'a Key,
    path: &'a str,
}

impl<'a> Site<'a> {
    /// Containers from the crawl root down to and including the container
    /// that holds this property.
    pub fn ancestors(&self) -> &'a [Container] {
        self.ancestors
    }

    /// The container that holds this property.
    pub fn container(&self) -> &'a Container {
        self.container
    }

    pub fn key(&self) -> &'a Key {
        self.key
    }

    /// JSON Pointer style location label, e.g. `#/paths/~1pets/get`.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Reads the value currently stored at this property.
    pub fn value(&self) -> Result<Node> {
        match self.container.get(self.key) {
            Ok(Some(node)) => Ok(node),
            Ok(None) => Err(DerefError::Traversal {
                message: format!("property '{}' no longer exists", self.key),
                path: self.path.to_string(),
            }),
            Err(e) => Err(DerefError::Traversal {
                message: format!("cannot read property '{}': {}", self.key, e),
                path: self.path.to_string(),
            }),
        }
    }

    /// Overwrites the value stored at this property in place.
    pub fn replace(&self, value: Node) -> Result<()> {
        match self.container.set(self.key, value) {
            Ok(true) => Ok(()),
            Ok(false) => Err(DerefError::Traversal {
                message: format!("property '{}' no longer exists", self.key),
                path: self.path.to_string(),
            }),
            Err(e) => Err(DerefError::Traversal {
                message: format!("cannot write property '{}': {}", self.key, e),
                path: self.path.to_string(),
            }),
        }
    }
}

/// Depth-first, pre-order crawler over a document graph.
///
/// Every (container, key) pair reachable from the root is handed to the
/// visitor once per path that reaches it. The visitor may rewrite the value
/// at the current key; the crawler reads the value again after the visitor
/// returns, so it always descends into what is stored there now.
pub struct Crawler {
    root_label: String,
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

impl Crawler {
    /// Creates a crawler whose path labels start at `#`.
    pub fn new() -> Self {
        Self {
            root_label: "#".to_string(),
        }
    }

    /// Creates a crawler whose path labels start at `label` instead of `#`.
    pub fn with_root_label(label: impl Into<String>) -> Self {
        Self {
            root_label: label.into(),
        }
    }

    /// Crawls everything reachable from `root`.
    ///
    /// Mapping keys are visited in insertion order and sequence indices in
    /// ascending order. Scalars are visited but never descended into; a
    /// scalar root yields no visits at all. The first error returned by the
    /// visitor stops the crawl and is returned as-is.
    pub fn crawl<F>(&self, root: &Node, mut visit: F) -> Result<()>
    where
        F: FnMut(&Site<'_>) -> Result<Descend>,
    {
        let Some(container) = root.as_container() else {
            return Ok(());
        };
        let mut ancestors = vec![container];
        self.crawl_container(&mut ancestors, &self.root_label, &mut visit)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Visits every key of the last container in `ancestors`, descending
    /// where the visitor allows.
    fn crawl_container<F>(
        &self,
        ancestors: &mut Vec<Container>,
        path: &str,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&Site<'_>) -> Result<Descend>,
    {
        let Some(container) = ancestors.last().cloned() else {
            return Ok(());
        };

        // The visitor only ever replaces values, so the key set is stable.
        let keys = container.keys().map_err(|e| DerefError::Traversal {
            message: format!("cannot list properties: {}", e),
            path: path.to_string(),
        })?;

        for key in keys {
            let child_path = format!("{}/{}", path, key.escaped());

            let current = {
                let site = Site {
                    ancestors: ancestors.as_slice(),
                    container: &container,
                    key: &key,
                    path: &child_path,
                };
                if visit(&site)? == Descend::Skip {
                    continue;
                }
                site.value()?
            };

            if let Some(child) = current.as_container() {
                ancestors.push(child);
                let result = self.crawl_container(ancestors, &child_path, visit);
                ancestors.pop();
                result?;
            }
        }

        Ok(())
    }
}
