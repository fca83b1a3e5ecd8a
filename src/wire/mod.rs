//! The uncompressed tagged wire format.
//!
//! Every value is a one-byte tag followed by its payload. Multi-byte numbers
//! and length prefixes are little-endian; strings, blobs, lists and maps carry
//! a 4-byte length or count.

pub mod decode;
pub mod encode;
pub mod tag;

pub use decode::{DEFAULT_MAX_DEPTH, decode_at, decode_value, decode_value_with_depth};
pub use encode::encode_value;
