use std::fmt;
use std::iter::FusedIterator;
use std::vec;

use crate::codec::ValueCodec;
use crate::error::Result;
use crate::map::TypedMapView;
use crate::node::Node;

/// A key of a [`TypedMapView`], read and written through to the node on
/// every call.
pub struct EntryView<'a, N, C> {
    map: &'a TypedMapView<N, C>,
    key: String,
}

impl<'a, N: Node, C: ValueCodec> EntryView<'a, N, C> {
    pub(crate) fn new(map: &'a TypedMapView<N, C>, key: String) -> Self {
        Self { map, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current value, or `None` if the key has since been removed from
    /// the node. Fails if the stored string does not decode.
    pub fn value(&self) -> Result<Option<C::Value>> {
        self.map.read(&self.key)
    }

    pub fn value_or(&self, default: C::Value) -> Result<C::Value> {
        Ok(self.value()?.unwrap_or(default))
    }

    /// Writes `value` to the node and returns the previous value, if it
    /// decoded.
    pub fn set_value(&self, value: C::Value) -> Result<Option<C::Value>> {
        self.map.write(&self.key, &value)
    }

    pub fn remove(&self) -> Result<Option<C::Value>> {
        self.map.delete(&self.key)
    }
}

impl<N, C> fmt::Debug for EntryView<'_, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryView").field("key", &self.key).finish()
    }
}

/// Entries over the keys a node had when iteration started.
pub struct Entries<'a, N, C> {
    map: &'a TypedMapView<N, C>,
    keys: vec::IntoIter<String>,
}

impl<'a, N: Node, C: ValueCodec> Entries<'a, N, C> {
    pub(crate) fn new(map: &'a TypedMapView<N, C>, keys: Vec<String>) -> Self {
        Self {
            map,
            keys: keys.into_iter(),
        }
    }
}

impl<'a, N: Node, C: ValueCodec> Iterator for Entries<'a, N, C> {
    type Item = EntryView<'a, N, C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next().map(|key| EntryView::new(self.map, key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<N: Node, C: ValueCodec> ExactSizeIterator for Entries<'_, N, C> {}

impl<N: Node, C: ValueCodec> FusedIterator for Entries<'_, N, C> {}
