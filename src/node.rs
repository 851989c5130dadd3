use std::io;
use std::sync::Arc;

/// A flat, string-keyed container of string values.
///
/// Every method takes `&self`: a node is shared between the views built on top
/// of it and whoever else writes to the store, so implementations synchronize
/// internally.
pub trait Node {
    fn keys(&self) -> io::Result<Vec<String>>;

    fn get(&self, key: &str) -> io::Result<Option<String>>;

    fn put(&self, key: &str, value: &str) -> io::Result<()>;

    fn remove(&self, key: &str) -> io::Result<()>;

    fn clear(&self) -> io::Result<()>;

    fn contains_key(&self, key: &str) -> io::Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

macro_rules! forward_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<N: Node + ?Sized> Node for $ty {
                fn keys(&self) -> io::Result<Vec<String>> {
                    (**self).keys()
                }

                fn get(&self, key: &str) -> io::Result<Option<String>> {
                    (**self).get(key)
                }

                fn put(&self, key: &str, value: &str) -> io::Result<()> {
                    (**self).put(key, value)
                }

                fn remove(&self, key: &str) -> io::Result<()> {
                    (**self).remove(key)
                }

                fn clear(&self) -> io::Result<()> {
                    (**self).clear()
                }

                fn contains_key(&self, key: &str) -> io::Result<bool> {
                    (**self).contains_key(key)
                }
            }
        )*
    };
}

forward_node!(&N, Arc<N>, Box<N>);
