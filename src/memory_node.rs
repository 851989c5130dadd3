use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::node::Node;

/// Longest key a preferences store conventionally accepts, in bytes.
pub const MAX_KEY_LEN: usize = 80;

/// Longest value a preferences store conventionally accepts, in bytes.
pub const MAX_VALUE_LEN: usize = 8 * 1024;

/// Size bounds enforced by a [`MemoryNode`] on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimits {
    pub max_key_len: usize,
    pub max_value_len: usize,
}

impl NodeLimits {
    pub const fn unbounded() -> Self {
        Self {
            max_key_len: usize::MAX,
            max_value_len: usize::MAX,
        }
    }

    fn check(&self, key: &str, value: &str) -> io::Result<()> {
        if key.len() > self.max_key_len {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "key too long"));
        }

        if value.len() > self.max_value_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "value too long",
            ));
        }

        Ok(())
    }
}

impl Default for NodeLimits {
    fn default() -> Self {
        Self {
            max_key_len: MAX_KEY_LEN,
            max_value_len: MAX_VALUE_LEN,
        }
    }
}

/// An in-process node.
///
/// Readers load the current map without locking; writers publish a modified
/// copy, so a write costs a clone of the whole node. Nodes are expected to be
/// small.
pub struct MemoryNode {
    limits: NodeLimits,
    entries: ArcSwap<BTreeMap<String, String>>,
}

impl MemoryNode {
    pub fn new() -> Self {
        Self::with_limits(NodeLimits::default())
    }

    pub fn with_limits(limits: NodeLimits) -> Self {
        Self {
            limits,
            entries: ArcSwap::from_pointee(BTreeMap::new()),
        }
    }

    pub fn limits(&self) -> NodeLimits {
        self.limits
    }

    /// The node's contents at this instant.
    pub fn snapshot(&self) -> Arc<BTreeMap<String, String>> {
        self.entries.load_full()
    }
}

impl Default for MemoryNode {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryNode
where
    K: Into<String>,
    V: Into<String>,
{
    /// Seeds a node with the default limits. Seeded entries are taken as
    /// given; limits apply to later writes.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: BTreeMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self {
            limits: NodeLimits::default(),
            entries: ArcSwap::from_pointee(entries),
        }
    }
}

impl Node for MemoryNode {
    fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.load().keys().cloned().collect())
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.load().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> io::Result<()> {
        self.limits.check(key, value)?;

        self.entries.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.insert(key.to_owned(), value.to_owned());
            next
        });

        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        if !self.entries.load().contains_key(key) {
            return Ok(());
        }

        self.entries.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.remove(key);
            next
        });

        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.entries.store(Arc::new(BTreeMap::new()));
        Ok(())
    }

    fn contains_key(&self, key: &str) -> io::Result<bool> {
        Ok(self.entries.load().contains_key(key))
    }
}
