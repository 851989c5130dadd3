use std::collections::BTreeMap;
use std::fmt;

use crate::codec::{Builtin, ValueCodec};
use crate::entry::{EntryView, Entries};
use crate::error::{Error, Result};
use crate::key::AsKey;
use crate::node::Node;

/// A typed, map-shaped view over a [`Node`].
///
/// The view holds no data of its own. Every call reads or writes the node, so
/// changes made through other views or directly on the node are visible on the
/// next call, and two calls may observe different contents. Nothing is cached.
pub struct TypedMapView<N, C> {
    node: N,
    codec: C,
}

/// Views `node` with the built-in codec for `T`.
///
/// ```ignore
/// let numbers = pref_map::map::<i64, _>(&node);
/// numbers.insert("M", 4)?;
/// ```
pub fn map<T: Builtin, N: Node>(node: N) -> TypedMapView<N, T::Codec> {
    TypedMapView::new(node, T::Codec::default())
}

/// Views `node` through an explicit codec.
pub fn map_with<N: Node, C: ValueCodec>(node: N, codec: C) -> TypedMapView<N, C> {
    TypedMapView::new(node, codec)
}

fn exact_key<K: AsKey + ?Sized>(key: &K) -> Result<&str> {
    key.as_key().ok_or_else(|| Error::InvalidKeyType {
        found: key.type_label(),
    })
}

impl<N: Node, C: ValueCodec> TypedMapView<N, C> {
    pub fn new(node: N, codec: C) -> Self {
        Self { node, codec }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn into_node(self) -> N {
        self.node
    }

    fn decode(&self, key: &str, raw: &str) -> Result<C::Value> {
        self.codec
            .decode(raw)
            .map_err(|source| Error::MalformedValue {
                key: key.to_owned(),
                source,
            })
    }

    /// Reads and decodes `key`, propagating decode failures.
    pub(crate) fn read(&self, key: &str) -> Result<Option<C::Value>> {
        match self.node.get(key)? {
            Some(raw) => self.decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Reads `key` for a return value: a value that does not decode counts as
    /// absent. Node failures still propagate.
    fn read_lenient(&self, key: &str) -> Result<Option<C::Value>> {
        match self.read(key) {
            Err(Error::MalformedValue { source, .. }) => {
                log::warn!("dropping undecodable previous value of `{key}`: {source}");
                Ok(None)
            }
            other => other,
        }
    }

    pub(crate) fn write(&self, key: &str, value: &C::Value) -> Result<Option<C::Value>> {
        let raw = self
            .codec
            .encode(value)
            .map_err(|source| Error::Unencodable {
                key: key.to_owned(),
                source,
            })?;

        let previous = self.read_lenient(key)?;
        self.node.put(key, &raw)?;
        log::debug!("put `{key}` ({} bytes)", raw.len());

        Ok(previous)
    }

    pub(crate) fn delete(&self, key: &str) -> Result<Option<C::Value>> {
        let previous = self.read_lenient(key)?;
        self.node.remove(key)?;
        log::debug!("removed `{key}`");

        Ok(previous)
    }

    /// The decoded value under `key`, or `None` if the node has no such key.
    ///
    /// Fails with [`Error::InvalidKeyType`] for a non-string key and with
    /// [`Error::MalformedValue`] if the stored string does not decode.
    pub fn get<K: AsKey + ?Sized>(&self, key: &K) -> Result<Option<C::Value>> {
        self.read(exact_key(key)?)
    }

    /// Stores `value` under `key` and returns the previous value.
    ///
    /// A previous value that fails to decode is returned as `None`; the write
    /// still happens.
    pub fn insert<K>(&self, key: &K, value: C::Value) -> Result<Option<C::Value>>
    where
        K: AsKey + ?Sized,
    {
        self.write(exact_key(key)?, &value)
    }

    /// Deletes `key` and returns the removed value, decoded the same
    /// best-effort way as [`insert`](Self::insert).
    pub fn remove<K: AsKey + ?Sized>(&self, key: &K) -> Result<Option<C::Value>> {
        self.delete(exact_key(key)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.node.clear()?;
        log::debug!("cleared node");
        Ok(())
    }

    /// Whether the node has `key`. A non-string key is never contained.
    pub fn contains_key<K: AsKey + ?Sized>(&self, key: &K) -> Result<bool> {
        match key.as_key() {
            Some(key) => Ok(self.node.contains_key(key)?),
            None => Ok(false),
        }
    }

    /// Whether some entry decodes to `value`. Entries that do not decode are
    /// skipped.
    pub fn contains_value(&self, value: &C::Value) -> Result<bool>
    where
        C::Value: PartialEq,
    {
        for key in self.node.keys()? {
            let Some(raw) = self.node.get(&key)? else {
                continue;
            };

            match self.codec.decode(&raw) {
                Ok(decoded) if decoded == *value => return Ok(true),
                Ok(_) => {}
                Err(e) => log::trace!("contains_value skips `{key}`: {e}"),
            }
        }

        Ok(false)
    }

    /// Every value in the node. Fails if any entry does not decode.
    pub fn values(&self) -> Result<Vec<C::Value>> {
        let mut values = Vec::new();

        for key in self.node.keys()? {
            if let Some(value) = self.read(&key)? {
                values.push(value);
            }
        }

        Ok(values)
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.node.keys()?)
    }

    /// One entry per key present now. Values are read when asked for.
    pub fn entries(&self) -> Result<Entries<'_, N, C>> {
        Ok(Entries::new(self, self.node.keys()?))
    }

    /// The entry for `key`, whether or not the node has it yet.
    pub fn entry<K: AsKey + ?Sized>(&self, key: &K) -> Result<EntryView<'_, N, C>> {
        Ok(EntryView::new(self, exact_key(key)?.to_owned()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.node.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Writes every pair in order, stopping at the first failure.
    pub fn extend_from<I, K>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, C::Value)>,
        K: AsKey,
    {
        for (key, value) in entries {
            self.insert(&key, value)?;
        }

        Ok(())
    }

    /// A detached copy of the node's decoded contents.
    pub fn snapshot(&self) -> Result<BTreeMap<String, C::Value>> {
        let mut copy = BTreeMap::new();

        for key in self.node.keys()? {
            if let Some(value) = self.read(&key)? {
                copy.insert(key, value);
            }
        }

        Ok(copy)
    }
}

impl<N, C: fmt::Debug> fmt::Debug for TypedMapView<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedMapView")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
