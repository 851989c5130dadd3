use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::codec::ValueCodec;
use crate::error::CodecError;

/// Stores strings as themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringCodec;

impl ValueCodec for StringCodec {
    type Value = String;

    fn encode(&self, value: &String) -> Result<String, CodecError> {
        Ok(value.clone())
    }

    fn decode(&self, raw: &str) -> Result<String, CodecError> {
        Ok(raw.to_owned())
    }
}

/// Stores any value with a canonical text form: `Display` to write, `FromStr`
/// to read back. Parsing is exactly the type's own, with no trimming.
pub struct ParseCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

pub type IntegerCodec = ParseCodec<i64>;
pub type FloatCodec = ParseCodec<f64>;
pub type BooleanCodec = ParseCodec<bool>;

impl<T> ParseCodec<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ParseCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ParseCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ParseCodec<T> {}

impl<T> fmt::Debug for ParseCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParseCodec<{}>", type_name::<T>())
    }
}

impl<T> ValueCodec for ParseCodec<T>
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    type Value = T;

    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(value.to_string())
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        raw.parse().map_err(|e: T::Err| CodecError::Parse {
            target: type_name::<T>(),
            raw: raw.to_owned(),
            reason: e.to_string(),
        })
    }
}
