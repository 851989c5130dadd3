//! Keys accepted by map lookups.
//!
//! Node keys are always strings. Lookups are generic over [`AsKey`] so that a
//! caller holding a key of some other type gets a typed answer: exact lookups
//! reject it, membership tests say "no".

use std::any::{Any, type_name};
use std::borrow::Cow;

pub trait AsKey {
    /// The string key, or `None` if `self` is not a string.
    fn as_key(&self) -> Option<&str>;

    fn type_label(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl AsKey for str {
    fn as_key(&self) -> Option<&str> {
        Some(self)
    }
}

impl AsKey for String {
    fn as_key(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl AsKey for Cow<'_, str> {
    fn as_key(&self) -> Option<&str> {
        Some(self.as_ref())
    }
}

impl<K: AsKey + ?Sized> AsKey for &K {
    fn as_key(&self) -> Option<&str> {
        (**self).as_key()
    }

    fn type_label(&self) -> &'static str {
        (**self).type_label()
    }
}

fn downcast_key(any: &dyn Any) -> Option<&str> {
    any.downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| any.downcast_ref::<&'static str>().copied())
}

impl AsKey for dyn Any {
    fn as_key(&self) -> Option<&str> {
        downcast_key(self)
    }
}

impl AsKey for dyn Any + Send + Sync {
    fn as_key(&self) -> Option<&str> {
        downcast_key(self)
    }
}

macro_rules! non_string_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsKey for $ty {
                fn as_key(&self) -> Option<&str> {
                    None
                }
            }
        )*
    };
}

non_string_key!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);
