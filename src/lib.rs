//! b4xcodec — A pure-Rust codec for the B4X serialization format.
//!
//! Values are written as a tagged, length-prefixed byte stream (the wire
//! format) and the whole stream is wrapped in zlib. The tag values and byte
//! layouts match the serializer used by the B4X family of tools, so payloads
//! can be exchanged with programs built on it.
//!
//! # Architecture
//!
//! - **`types`** — The `Value` tree
//! - **`wire`** — Tag constants and the uncompressed encode/decode pair
//! - **`compress`** — zlib framing with truncation and size checks
//! - **`codec`** — `Codec`: configuration, compressed encode/decode, tag slot
//! - **`stream`** — Reading and writing one value over async byte streams
//!
//! ```
//! use b4xcodec::{Codec, Value};
//!
//! let codec = Codec::new();
//! let value = Value::List(vec![Value::from("hi"), Value::from(300)]);
//! let bytes = codec.encode(&value)?;
//! assert_eq!(codec.decode(&bytes)?, value);
//! # Ok::<(), b4xcodec::CodecError>(())
//! ```

pub mod codec;
pub mod compress;
pub mod error;
pub mod stream;
pub mod types;
pub mod wire;

pub use codec::{Codec, CodecBuilder, CodecConfig};
pub use error::CodecError;
pub use types::{Value, ValueMap};
