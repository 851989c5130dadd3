//! Arbitrary serde values stored in a single string cell.
//!
//! The payload is bincode (standard config) wrapped in a small envelope and
//! rendered as standard base64:
//!
//! ```text
//! magic    u32  0x504D4150
//! version  u8   1
//! type     u64 length + UTF-8 type name of the encoded value
//! payload  u64 length + bincode bytes
//! crc32    u32  over every preceding byte
//! ```
//!
//! All integers are big-endian. The type name lets a reader refuse a blob that
//! was written for a different type instead of misreading its bytes.

use std::any::type_name;
use std::fmt;
use std::io::{self, Cursor};
use std::marker::PhantomData;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Serialize, de::DeserializeOwned};

use crate::codec::ValueCodec;
use crate::error::CodecError;
use crate::io_ext::{ReadExt, WriteExt};

const MAGIC: u32 = 0x504D_4150;
const VERSION: u8 = 1;
const CHECKSUM_LEN: usize = 4;

/// Stores any `Serialize + DeserializeOwned` value, with no per-type setup.
///
/// ```ignore
/// let codec = StructuredCodec::<Movie>::new();
/// let cell = codec.encode(&movie)?;
/// assert_eq!(codec.decode(&cell)?, movie);
/// ```
pub struct StructuredCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> StructuredCodec<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for StructuredCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StructuredCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StructuredCodec<T> {}

impl<T> fmt::Debug for StructuredCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructuredCodec<{}>", type_name::<T>())
    }
}

fn seal(type_name: &str, payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(payload.len() + type_name.len() + 32);

    buf.write_u32(MAGIC)?;
    buf.write_u8(VERSION)?;
    buf.write_string(type_name)?;
    buf.write_bytes(payload)?;

    let checksum = crc32fast::hash(&buf);
    buf.write_u32(checksum)?;

    Ok(buf)
}

// Reads from the in-memory body can only fail by running out of bytes.
fn truncated(_: io::Error) -> CodecError {
    CodecError::Truncated
}

/// Checks the envelope and hands back the payload bytes.
fn open(expected_type: &str, blob: &[u8]) -> Result<Vec<u8>, CodecError> {
    if blob.len() < CHECKSUM_LEN {
        return Err(CodecError::Truncated);
    }

    let (body, tail) = blob.split_at(blob.len() - CHECKSUM_LEN);

    let mut cursor = Cursor::new(body);
    let magic = cursor.read_u32().map_err(truncated)?;
    if magic != MAGIC {
        return Err(CodecError::BadMagic { found: magic });
    }

    let version = cursor.read_u8().map_err(truncated)?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let mut stored = [0u8; CHECKSUM_LEN];
    stored.copy_from_slice(tail);
    let stored = u32::from_be_bytes(stored);
    let computed = crc32fast::hash(body);
    if stored != computed {
        return Err(CodecError::ChecksumMismatch { stored, computed });
    }

    let found = match cursor.read_string() {
        Ok(found) => found,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(CodecError::TypeMismatch {
                expected: expected_type.to_owned(),
                found: "<non-UTF-8 type name>".to_owned(),
            });
        }
        Err(e) => return Err(truncated(e)),
    };
    if found != expected_type {
        return Err(CodecError::TypeMismatch {
            expected: expected_type.to_owned(),
            found,
        });
    }

    let payload = cursor.read_bytes().map_err(truncated)?;

    let rest = body.len() - cursor.position() as usize;
    if rest != 0 {
        return Err(CodecError::TrailingBytes(rest));
    }

    Ok(payload)
}

impl<T> ValueCodec for StructuredCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn encode(&self, value: &T) -> Result<String, CodecError> {
        let payload = bincode::serde::encode_to_vec(value, bincode::config::standard())?;
        let blob = seal(type_name::<T>(), &payload)?;
        Ok(STANDARD.encode(blob))
    }

    fn decode(&self, raw: &str) -> Result<T, CodecError> {
        let blob = STANDARD.decode(raw)?;
        let payload = open(type_name::<T>(), &blob)?;

        let (value, read) =
            bincode::serde::decode_from_slice::<T, _>(&payload, bincode::config::standard())?;

        if read != payload.len() {
            return Err(CodecError::TrailingBytes(payload.len() - read));
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct ImdbId {
        prefix: String,
        number: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Movie {
        title: String,
        year: Option<u16>,
        imdb: ImdbId,
        genres: Vec<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Episode {
        title: String,
        season: u32,
    }

    fn hitchhiker() -> Movie {
        Movie {
            title: "The Hitchhiker's Guide to the Galaxy".to_owned(),
            year: Some(2005),
            imdb: ImdbId {
                prefix: "tt".to_owned(),
                number: 42,
            },
            genres: vec!["Comedy".to_owned(), "Sci-Fi".to_owned()],
        }
    }

    fn raw_blob(codec: &StructuredCodec<Movie>) -> Vec<u8> {
        STANDARD.decode(codec.encode(&hitchhiker()).unwrap()).unwrap()
    }

    #[test]
    fn test_sealed_envelope_opens_to_payload() {
        let blob = seal("demo::Payload", &[1, 2, 3]).unwrap();

        assert_eq!(open("demo::Payload", &blob).unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            open("demo::Other", &blob),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_round_trip_keeps_compound_identity() {
        let codec = StructuredCodec::<Movie>::new();
        let cell = codec.encode(&hitchhiker()).unwrap();

        let movie = codec.decode(&cell).unwrap();

        assert_eq!(movie.imdb, hitchhiker().imdb);
        assert_eq!(movie, hitchhiker());
    }

    #[test]
    fn test_cell_is_printable() {
        let cell = StructuredCodec::<Movie>::new().encode(&hitchhiker()).unwrap();
        assert!(cell.chars().all(|c| c.is_ascii_alphanumeric() || "+/=".contains(c)));
    }

    #[test]
    fn test_absent_blob_is_truncated() {
        let codec = StructuredCodec::<Movie>::new();
        assert!(matches!(codec.decode(""), Err(CodecError::Truncated)));
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let codec = StructuredCodec::<Movie>::new();
        let blob = raw_blob(&codec);

        for len in [3, 8, blob.len() / 2, blob.len() - 1] {
            let cell = STANDARD.encode(&blob[..len]);
            assert!(codec.decode(&cell).is_err(), "prefix of {len} bytes decoded");
        }
    }

    #[test]
    fn test_not_base64() {
        let codec = StructuredCodec::<Movie>::new();
        assert!(matches!(codec.decode("Firefly!"), Err(CodecError::Base64(_))));
    }

    #[test]
    fn test_other_type_is_a_mismatch() {
        let cell = StructuredCodec::<Movie>::new().encode(&hitchhiker()).unwrap();

        let err = StructuredCodec::<Episode>::new().decode(&cell).unwrap_err();

        match err {
            CodecError::TypeMismatch { expected, found } => {
                assert!(expected.ends_with("Episode"));
                assert!(found.ends_with("Movie"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_corruption_fails_checksum() {
        let codec = StructuredCodec::<Movie>::new();
        let mut blob = raw_blob(&codec);
        let last_payload_byte = blob.len() - CHECKSUM_LEN - 1;
        blob[last_payload_byte] ^= 0xFF;

        let err = codec.decode(&STANDARD.encode(&blob)).unwrap_err();
        assert!(matches!(err, CodecError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_unknown_version_and_magic() {
        let codec = StructuredCodec::<Movie>::new();

        let mut blob = raw_blob(&codec);
        blob[4] = 9;
        assert!(matches!(
            codec.decode(&STANDARD.encode(&blob)),
            Err(CodecError::UnsupportedVersion(9))
        ));

        let mut blob = raw_blob(&codec);
        blob[0] = 0;
        assert!(matches!(
            codec.decode(&STANDARD.encode(&blob)),
            Err(CodecError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_trailing_envelope_bytes() {
        let codec = StructuredCodec::<u32>::new();
        let payload = bincode::serde::encode_to_vec(7u32, bincode::config::standard()).unwrap();

        let mut body = Vec::new();
        body.write_u32(MAGIC).unwrap();
        body.write_u8(VERSION).unwrap();
        body.write_string(type_name::<u32>()).unwrap();
        body.write_bytes(&payload).unwrap();
        body.push(0);
        let checksum = crc32fast::hash(&body);
        body.write_u32(checksum).unwrap();

        assert!(matches!(
            codec.decode(&STANDARD.encode(&body)),
            Err(CodecError::TrailingBytes(1))
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            title in ".*",
            year in any::<Option<u16>>(),
            number in any::<u32>(),
            genres in proptest::collection::vec("[a-zA-Z-]{1,12}", 0..4)
        ) {
            let movie = Movie {
                title,
                year,
                imdb: ImdbId { prefix: "tt".to_owned(), number },
                genres,
            };
            let codec = StructuredCodec::<Movie>::new();

            prop_assert_eq!(codec.decode(&codec.encode(&movie).unwrap()).unwrap(), movie);
        }
    }
}
