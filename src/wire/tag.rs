//! Wire tag byte constants.

pub const NULL: u8 = 0;
pub const STRING: u8 = 1;
pub const SHORT: u8 = 2;
pub const INT: u8 = 3;
pub const LONG: u8 = 4;

// Decode-only: single-precision float, 4 bytes.
pub const FLOAT: u8 = 5;

pub const DOUBLE: u8 = 6;
pub const BOOLEAN: u8 = 7;
pub const BYTE: u8 = 10;

// Decode-only: one UTF-16 code unit, 2 bytes.
pub const CHAR: u8 = 14;

pub const MAP: u8 = 20;
pub const LIST: u8 = 21;
pub const BLOB: u8 = 22;

// Byte arrays as written by the reference serializer. Read as `BLOB`.
pub const BLOB_ALT: u8 = 23;

// Reserved. No payload shape is defined, so decoding rejects it.
pub const TYPE: u8 = 24;
