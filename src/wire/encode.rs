//! Wire encoding: `Value` → uncompressed tagged bytes.

use bytes::{BufMut, BytesMut};

use super::tag;
use crate::error::CodecError;
use crate::types::Value;

/// Encodes a `Value` into the buffer.
///
/// On error the buffer is restored to its length before the call, so a
/// failed encode never leaves a partial value behind.
pub fn encode_value(buf: &mut BytesMut, value: &Value) -> Result<(), CodecError> {
    let start = buf.len();
    let result = write_value(buf, value, false);
    if result.is_err() {
        buf.truncate(start);
    }
    result
}

/// Canonical bytes identifying a map key. Unlike `encode_value` this accepts
/// `Char`, which only ever reaches a key through decoding.
pub(crate) fn key_fingerprint(key: &Value) -> Result<Vec<u8>, CodecError> {
    let mut buf = BytesMut::new();
    write_value(&mut buf, key, true)?;
    Ok(buf.to_vec())
}

fn write_value(buf: &mut BytesMut, value: &Value, allow_char: bool) -> Result<(), CodecError> {
    match value {
        Value::Null => encode_null(buf),
        Value::String(s) => encode_string(buf, s)?,
        // Booleans carry their own tag and never go through width selection.
        Value::Boolean(b) => encode_bool(buf, *b),
        Value::Byte(i) => encode_int(buf, i64::from(*i)),
        Value::Short(i) => encode_int(buf, i64::from(*i)),
        Value::Int(i) => encode_int(buf, i64::from(*i)),
        Value::Long(i) => encode_int(buf, *i),
        Value::Float(f) => encode_double(buf, f64::from(*f)),
        Value::Double(f) => encode_double(buf, *f),
        Value::Char(c) if allow_char => {
            buf.put_u8(tag::CHAR);
            buf.put_u16_le(*c);
        }
        Value::Char(_) => {
            return Err(CodecError::UnsupportedInputType(
                "char (decode-only, convert to a string first)".into(),
            ));
        }
        Value::Blob(b) => encode_blob(buf, b)?,
        Value::List(items) => {
            buf.put_u8(tag::LIST);
            buf.put_u32_le(length_prefix(items.len(), "list")?);
            for item in items {
                write_value(buf, item, allow_char)?;
            }
        }
        Value::Map(entries) => {
            buf.put_u8(tag::MAP);
            buf.put_u32_le(length_prefix(entries.len(), "map")?);
            for (key, value) in entries {
                write_value(buf, key, allow_char)?;
                write_value(buf, value, allow_char)?;
            }
        }
    }
    Ok(())
}

pub fn encode_null(buf: &mut BytesMut) {
    buf.put_u8(tag::NULL);
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(tag::BOOLEAN);
    buf.put_u8(u8::from(value));
}

/// Encodes an integer using the smallest signed width that holds it.
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    if let Ok(v) = i8::try_from(value) {
        buf.put_u8(tag::BYTE);
        buf.put_i8(v);
    } else if let Ok(v) = i16::try_from(value) {
        buf.put_u8(tag::SHORT);
        buf.put_i16_le(v);
    } else if let Ok(v) = i32::try_from(value) {
        buf.put_u8(tag::INT);
        buf.put_i32_le(v);
    } else {
        buf.put_u8(tag::LONG);
        buf.put_i64_le(value);
    }
}

pub fn encode_double(buf: &mut BytesMut, value: f64) {
    buf.put_u8(tag::DOUBLE);
    buf.put_f64_le(value);
}

/// Encodes a string (length = UTF-8 byte count, not char count).
pub fn encode_string(buf: &mut BytesMut, value: &str) -> Result<(), CodecError> {
    let len = length_prefix(value.len(), "string")?;
    buf.put_u8(tag::STRING);
    buf.put_u32_le(len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

pub fn encode_blob(buf: &mut BytesMut, value: &[u8]) -> Result<(), CodecError> {
    let len = length_prefix(value.len(), "blob")?;
    buf.put_u8(tag::BLOB);
    buf.put_u32_le(len);
    buf.put_slice(value);
    Ok(())
}

fn length_prefix(len: usize, kind: &str) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| {
        CodecError::UnsupportedInputType(format!("{kind} of length {len} exceeds u32 prefix"))
    })
}
