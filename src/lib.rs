//! Typed, live map views over flat string-keyed preference nodes.
//!
//! A [`Node`] stores strings under string keys. A [`TypedMapView`] pairs a
//! node with a [`ValueCodec`] and exposes it as a map of typed values, reading
//! and writing the node on every call.
//!
//! ```ignore
//! use pref_map::{MemoryNode, map};
//!
//! let node = MemoryNode::new();
//! let numbers = map::<i64, _>(&node);
//!
//! numbers.insert("M", 4)?;
//! assert_eq!(node.get("M")?, Some("4".to_owned()));
//! ```

mod entry;
mod error;
mod io_ext;
mod key;
mod map;
mod memory_node;
mod node;

pub mod codec;

pub use codec::{
    BooleanCodec, Builtin, FloatCodec, IntegerCodec, ParseCodec, StringCodec, StructuredCodec,
    ValueCodec,
};
pub use entry::{Entries, EntryView};
pub use error::{CodecError, Error, Result};
pub use key::AsKey;
pub use map::{TypedMapView, map, map_with};
pub use memory_node::{MAX_KEY_LEN, MAX_VALUE_LEN, MemoryNode, NodeLimits};
pub use node::Node;
