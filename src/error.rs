use std::io;

use thiserror::Error;

/// Why a string cell could not be turned into a value, or a value into a cell.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cannot parse {raw:?} as {target}: {reason}")]
    Parse {
        target: &'static str,
        raw: String,
        reason: String,
    },

    #[error("structured value is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("structured value is truncated")]
    Truncated,

    #[error("structured value has bad magic 0x{found:08x}")]
    BadMagic { found: u32 },

    #[error("structured value has unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    #[error("structured value encodes `{found}`, expected `{expected}`")]
    TypeMismatch { expected: String, found: String },

    #[error("structured value checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("structured value has {0} trailing payload bytes")]
    TrailingBytes(usize),

    #[error("cannot write structured value envelope: {0}")]
    Envelope(#[from] io::Error),

    #[error("cannot serialize value: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("cannot deserialize value: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

#[derive(Debug, Error)]
pub enum Error {
    /// A stored string does not decode as the map's value type.
    #[error("malformed value for key `{key}`: {source}")]
    MalformedValue {
        key: String,
        #[source]
        source: CodecError,
    },

    /// A lookup that needs an exact key was given something that is not a string.
    #[error("invalid key type: expected a string key, got `{found}`")]
    InvalidKeyType { found: &'static str },

    #[error("cannot encode value for key `{key}`: {source}")]
    Unencodable {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("node error: {0}")]
    Node(#[from] io::Error),
}

impl Error {
    pub fn is_malformed_value(&self) -> bool {
        matches!(self, Error::MalformedValue { .. })
    }

    pub fn is_invalid_key_type(&self) -> bool {
        matches!(self, Error::InvalidKeyType { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
