//! Conversions between typed values and the strings a node stores.

mod primitive;
mod structured;

pub use primitive::{BooleanCodec, FloatCodec, IntegerCodec, ParseCodec, StringCodec};
pub use structured::StructuredCodec;

use crate::error::CodecError;

/// A stateless pair of conversions between `Value` and its string cell.
///
/// `decode(&encode(v)?)` must give back a value equal to `v`.
pub trait ValueCodec {
    type Value;

    fn encode(&self, value: &Self::Value) -> Result<String, CodecError>;

    fn decode(&self, raw: &str) -> Result<Self::Value, CodecError>;
}

impl<C: ValueCodec + ?Sized> ValueCodec for &C {
    type Value = C::Value;

    fn encode(&self, value: &Self::Value) -> Result<String, CodecError> {
        (**self).encode(value)
    }

    fn decode(&self, raw: &str) -> Result<Self::Value, CodecError> {
        (**self).decode(raw)
    }
}

/// Value types with a built-in codec, selected by type alone.
pub trait Builtin: Sized {
    type Codec: ValueCodec<Value = Self> + Default;
}

impl Builtin for String {
    type Codec = StringCodec;
}

macro_rules! parsed_builtin {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Builtin for $ty {
                type Codec = ParseCodec<$ty>;
            }
        )*
    };
}

parsed_builtin!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
