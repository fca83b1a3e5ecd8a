//! Wire decoding: uncompressed tagged bytes → `Value`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use bytes::Buf;

use super::encode::key_fingerprint;
use super::tag;
use crate::error::CodecError;
use crate::types::{Value, ValueMap};

/// Default limit on nested lists and maps.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decodes a single `Value` from the buffer with the default depth limit.
pub fn decode_value(buf: &mut impl Buf) -> Result<Value, CodecError> {
    decode_value_with_depth(buf, DEFAULT_MAX_DEPTH)
}

/// Decodes a single `Value`, allowing at most `max_depth` nested containers.
pub fn decode_value_with_depth(buf: &mut impl Buf, max_depth: usize) -> Result<Value, CodecError> {
    decode_nested(buf, max_depth)
}

/// Decodes the value starting at `offset` in `data`.
///
/// Returns the value and the offset just past it.
pub fn decode_at(
    data: &[u8],
    offset: usize,
    max_depth: usize,
) -> Result<(Value, usize), CodecError> {
    let Some(mut cursor) = data.get(offset..) else {
        return Err(CodecError::MalformedStream(format!(
            "offset {offset} is past the end of {} bytes",
            data.len()
        )));
    };
    let value = decode_nested(&mut cursor, max_depth)?;
    Ok((value, data.len() - cursor.len()))
}

fn decode_nested(buf: &mut impl Buf, depth_left: usize) -> Result<Value, CodecError> {
    if !buf.has_remaining() {
        return Err(CodecError::MalformedStream("unexpected end of data".into()));
    }

    let t = buf.get_u8();
    match t {
        tag::NULL => Ok(Value::Null),

        tag::STRING => {
            let len = read_len(buf)?;
            decode_string_data(buf, len)
        }

        tag::BOOLEAN => {
            ensure_remaining(buf, 1)?;
            Ok(Value::Boolean(buf.get_u8() != 0))
        }

        // Integers
        tag::BYTE => {
            ensure_remaining(buf, 1)?;
            Ok(Value::Byte(buf.get_i8()))
        }
        tag::SHORT => {
            ensure_remaining(buf, 2)?;
            Ok(Value::Short(buf.get_i16_le()))
        }
        tag::INT => {
            ensure_remaining(buf, 4)?;
            Ok(Value::Int(buf.get_i32_le()))
        }
        tag::LONG => {
            ensure_remaining(buf, 8)?;
            Ok(Value::Long(buf.get_i64_le()))
        }

        // Floats
        tag::FLOAT => {
            ensure_remaining(buf, 4)?;
            Ok(Value::Float(buf.get_f32_le()))
        }
        tag::DOUBLE => {
            ensure_remaining(buf, 8)?;
            Ok(Value::Double(buf.get_f64_le()))
        }

        tag::CHAR => {
            ensure_remaining(buf, 2)?;
            Ok(Value::Char(buf.get_u16_le()))
        }

        tag::BLOB | tag::BLOB_ALT => {
            let len = read_len(buf)?;
            ensure_remaining(buf, len)?;
            let mut data = vec![0u8; len];
            buf.copy_to_slice(&mut data);
            Ok(Value::Blob(data))
        }

        tag::LIST => {
            let len = read_len(buf)?;
            let depth_left = descend(depth_left)?;
            let mut items = Vec::with_capacity(len.min(buf.remaining()));
            for _ in 0..len {
                items.push(decode_nested(buf, depth_left)?);
            }
            Ok(Value::List(items))
        }

        tag::MAP => {
            let len = read_len(buf)?;
            let depth_left = descend(depth_left)?;
            decode_map_data(buf, len, depth_left)
        }

        _ => Err(CodecError::UnsupportedTag(t)),
    }
}

fn descend(depth_left: usize) -> Result<usize, CodecError> {
    depth_left
        .checked_sub(1)
        .ok_or_else(|| CodecError::MalformedStream("container nesting exceeds depth limit".into()))
}

fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), CodecError> {
    if buf.remaining() < needed {
        Err(CodecError::MalformedStream(format!(
            "need {needed} bytes but only {} remaining",
            buf.remaining()
        )))
    } else {
        Ok(())
    }
}

/// Reads a 4-byte little-endian length or count prefix.
fn read_len(buf: &mut impl Buf) -> Result<usize, CodecError> {
    ensure_remaining(buf, 4)?;
    usize::try_from(buf.get_u32_le()).map_err(CodecError::malformed)
}

fn decode_string_data(buf: &mut impl Buf, len: usize) -> Result<Value, CodecError> {
    ensure_remaining(buf, len)?;
    let mut data = vec![0u8; len];
    buf.copy_to_slice(&mut data);
    let s = String::from_utf8(data)
        .map_err(|e| CodecError::MalformedStream(format!("invalid UTF-8 string: {e}")))?;
    Ok(Value::String(s))
}

/// Decodes `len` key/value pairs. A repeated key overwrites the value of the
/// first entry with that key and keeps its position.
fn decode_map_data(
    buf: &mut impl Buf,
    len: usize,
    depth_left: usize,
) -> Result<Value, CodecError> {
    let mut entries = ValueMap::with_capacity(len.min(buf.remaining()));
    let mut index: HashMap<Vec<u8>, usize> = HashMap::new();
    for _ in 0..len {
        let key = decode_nested(buf, depth_left)?;
        let value = decode_nested(buf, depth_left)?;
        match index.entry(key_fingerprint(&key)?) {
            Entry::Occupied(slot) => entries[*slot.get()].1 = value,
            Entry::Vacant(slot) => {
                slot.insert(entries.len());
                entries.push((key, value));
            }
        }
    }
    Ok(Value::Map(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode;
    use bytes::BytesMut;

    /// Encode then decode a value and verify round-trip.
    fn round_trip(value: &Value) -> Value {
        let mut buf = BytesMut::new();
        encode::encode_value(&mut buf, value).expect("encode failed");
        let mut cursor = &buf[..];
        let decoded = decode_value(&mut cursor).expect("decode failed");
        assert!(cursor.is_empty(), "decoder left {} bytes", cursor.len());
        decoded
    }

    fn decode_bytes(bytes: &[u8]) -> Result<Value, CodecError> {
        let mut cursor = bytes;
        decode_value(&mut cursor)
    }

    #[test]
    fn round_trip_scalars() {
        for v in [
            Value::Null,
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Double(3.14159),
            Value::Double(f64::INFINITY),
            Value::from(""),
            Value::from("héllo"),
            Value::Blob(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            Value::Blob(vec![]),
        ] {
            assert_eq!(round_trip(&v), v);
        }
    }

    #[test]
    fn round_trip_integers() {
        for i in [
            0,
            -1,
            127,
            128,
            -128,
            -129,
            32767,
            32768,
            -32768,
            -32769,
            i64::from(i32::MAX),
            i64::from(i32::MAX) + 1,
            i64::from(i32::MIN),
            i64::from(i32::MIN) - 1,
            i64::MAX,
            i64::MIN,
        ] {
            assert_eq!(round_trip(&Value::Long(i)).as_i64(), Some(i), "failed for {i}");
        }
    }

    #[test]
    fn decoded_width_is_minimal() {
        assert!(matches!(round_trip(&Value::Long(100)), Value::Byte(100)));
        assert!(matches!(round_trip(&Value::Long(1000)), Value::Short(1000)));
        assert!(matches!(round_trip(&Value::Long(100_000)), Value::Int(100_000)));
    }

    #[test]
    fn round_trip_nested() {
        let val = Value::Map(vec![
            (Value::from("name"), Value::from("Alice")),
            (
                Value::from("tags"),
                Value::List(vec![Value::from(3), Value::from(1), Value::from(2)]),
            ),
            (Value::from(7), Value::Map(vec![])),
            (Value::Null, Value::List(vec![])),
        ]);
        assert_eq!(round_trip(&val), val);
    }

    #[test]
    fn float_tag_decodes_single_precision() {
        let mut bytes = vec![tag::FLOAT];
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        let v = decode_bytes(&bytes).unwrap();
        assert!(matches!(v, Value::Float(f) if f == 1.5));
    }

    #[test]
    fn char_tag_decodes_code_unit() {
        let v = decode_bytes(&[tag::CHAR, 0xE9, 0x00]).unwrap();
        assert!(matches!(v, Value::Char(0xE9)));
    }

    #[test]
    fn alternate_blob_tag() {
        let v = decode_bytes(&[tag::BLOB_ALT, 1, 0, 0, 0, 0x42]).unwrap();
        assert_eq!(v, Value::Blob(vec![0x42]));
    }

    #[test]
    fn nonzero_boolean_is_true() {
        assert_eq!(decode_bytes(&[tag::BOOLEAN, 2]).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn unknown_tag_rejected() {
        assert!(matches!(decode_bytes(&[99]), Err(CodecError::UnsupportedTag(99))));
    }

    #[test]
    fn reserved_type_tag_rejected() {
        assert!(matches!(
            decode_bytes(&[tag::TYPE, 0, 0]),
            Err(CodecError::UnsupportedTag(24))
        ));
    }

    #[test]
    fn truncated_payloads_rejected() {
        for bytes in [
            &[][..],
            &[tag::INT, 1, 2][..],
            &[tag::STRING, 10, 0, 0, 0, b'a'][..],
            &[tag::BLOB, 1, 0][..],
            &[tag::LIST, 2, 0, 0, 0, tag::NULL][..],
            &[tag::MAP, 1, 0, 0, 0, tag::NULL][..],
        ] {
            assert!(
                matches!(decode_bytes(bytes), Err(CodecError::MalformedStream(_))),
                "accepted {bytes:?}"
            );
        }
    }

    #[test]
    fn huge_declared_count_does_not_preallocate() {
        let bytes = [tag::LIST, 0xFF, 0xFF, 0xFF, 0xFF, tag::NULL];
        assert!(matches!(decode_bytes(&bytes), Err(CodecError::MalformedStream(_))));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let bytes = [tag::STRING, 2, 0, 0, 0, 0xC3, 0x28];
        assert!(matches!(decode_bytes(&bytes), Err(CodecError::MalformedStream(_))));
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let mut buf = BytesMut::new();
        let map = Value::Map(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]);
        encode::encode_value(&mut buf, &map).unwrap();
        let decoded = decode_bytes(&buf).unwrap();
        assert_eq!(
            decoded,
            Value::Map(vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2)),
            ])
        );
    }

    #[test]
    #[rustfmt::skip]
    fn keys_of_different_width_are_the_same_key() {
        // Map { Short(1): true, Byte(1): false } as an external producer might write it.
        let bytes = [
            tag::MAP, 2, 0, 0, 0,
            tag::SHORT, 1, 0, tag::BOOLEAN, 1,
            tag::BYTE, 1, tag::BOOLEAN, 0,
        ];
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.as_map().map(<[_]>::len), Some(1));
        assert_eq!(decoded.get(&Value::from(1)), Some(&Value::Boolean(false)));
    }

    #[test]
    fn keys_of_different_tags_stay_distinct() {
        let mut buf = BytesMut::new();
        let map = Value::Map(vec![
            (Value::from(1), Value::from("byte")),
            (Value::Double(1.0), Value::from("double")),
            (Value::Boolean(true), Value::from("bool")),
            (Value::Double(0.0), Value::from("zero")),
            (Value::Double(-0.0), Value::from("negative zero")),
        ]);
        encode::encode_value(&mut buf, &map).unwrap();
        let decoded = decode_bytes(&buf).unwrap();
        assert_eq!(decoded.as_map().map(<[_]>::len), Some(5));
    }

    #[test]
    fn default_depth_fits_small_thread_stack() {
        let mut bytes = Vec::new();
        for _ in 0..DEFAULT_MAX_DEPTH {
            // Map of one entry whose key is null and whose value is the next level.
            bytes.extend_from_slice(&[tag::MAP, 1, 0, 0, 0, tag::NULL]);
        }
        bytes.push(tag::NULL);

        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let mut cursor = &bytes[..];
                decode_value(&mut cursor).map(|_| ())
            })
            .unwrap();
        assert!(handle.join().unwrap().is_ok());
    }

    #[test]
    fn depth_limit_enforced() {
        let mut bytes = Vec::new();
        for _ in 0..10 {
            bytes.extend_from_slice(&[tag::LIST, 1, 0, 0, 0]);
        }
        bytes.push(tag::NULL);

        let mut cursor = &bytes[..];
        assert!(decode_value_with_depth(&mut cursor, 10).is_ok());

        let mut cursor = &bytes[..];
        assert!(matches!(
            decode_value_with_depth(&mut cursor, 9),
            Err(CodecError::MalformedStream(_))
        ));
    }

    #[test]
    fn decode_at_returns_next_offset() {
        let data = [0xFF, tag::BYTE, 5, tag::STRING, 1, 0, 0, 0, b'x'];
        let (first, next) = decode_at(&data, 1, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(first, Value::from(5));
        assert_eq!(next, 3);
        let (second, end) = decode_at(&data, next, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(second, Value::from("x"));
        assert_eq!(end, data.len());
        assert!(decode_at(&data, end + 1, DEFAULT_MAX_DEPTH).is_err());
    }
}
