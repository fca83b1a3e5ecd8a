//! The dynamically-typed value tree.

use std::fmt;

use crate::error::CodecError;
use crate::wire::tag;

/// Map entries in encounter order. Keys are not required to be unique.
pub type ValueMap = Vec<(Value, Value)>;

/// A value in the serialization format, one variant per wire tag.
///
/// Integer variants compare by numeric value and `Float`/`Double` compare as
/// `f64`, so a value equals its decoded form even when the encoder picked a
/// different width.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    String(String),
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// A single UTF-16 code unit. Only produced by decoding.
    Char(u16),
    Blob(Vec<u8>),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Builds the narrowest integer variant that holds `value`.
    pub fn integer(value: i64) -> Self {
        if let Ok(v) = i8::try_from(value) {
            Self::Byte(v)
        } else if let Ok(v) = i16::try_from(value) {
            Self::Short(v)
        } else if let Ok(v) = i32::try_from(value) {
            Self::Int(v)
        } else {
            Self::Long(value)
        }
    }

    /// Returns the wire tag this variant is written or read with.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Null => tag::NULL,
            Self::String(_) => tag::STRING,
            Self::Boolean(_) => tag::BOOLEAN,
            Self::Byte(_) => tag::BYTE,
            Self::Short(_) => tag::SHORT,
            Self::Int(_) => tag::INT,
            Self::Long(_) => tag::LONG,
            Self::Float(_) => tag::FLOAT,
            Self::Double(_) => tag::DOUBLE,
            Self::Char(_) => tag::CHAR,
            Self::Blob(_) => tag::BLOB,
            Self::List(_) => tag::LIST,
            Self::Map(_) => tag::MAP,
        }
    }

    /// Short lowercase name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Char(_) => "char",
            Self::Blob(_) => "blob",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any integer variant widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(i) => Some(i64::from(*i)),
            Self::Short(i) => Some(i64::from(*i)),
            Self::Int(i) => Some(i64::from(*i)),
            Self::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns `Float` or `Double` widened to `f64`. Integers are not floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(f64::from(*f)),
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up `key` in a map. With duplicate keys the last entry wins.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => match (self.as_i64(), other.as_i64()) {
                (Some(a), Some(b)) => a == b,
                _ => matches!((self.as_f64(), other.as_f64()), (Some(a), Some(b)) if a == b),
            },
        }
    }
}

// -- Convenience conversions --

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i8> for Value {
    fn from(i: i8) -> Self {
        Self::Byte(i)
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Self::Short(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Long(i)
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Self::Short(i16::from(i))
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Self::Int(i32::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Long(i64::from(i))
    }
}

impl TryFrom<u64> for Value {
    type Error = CodecError;

    fn try_from(i: u64) -> Result<Self, Self::Error> {
        i64::try_from(i).map(Self::Long).map_err(|_| {
            CodecError::UnsupportedInputType(format!("u64 {i} does not fit a signed 64-bit long"))
        })
    }
}

impl TryFrom<i128> for Value {
    type Error = CodecError;

    fn try_from(i: i128) -> Result<Self, Self::Error> {
        i64::try_from(i).map(Self::Long).map_err(|_| {
            CodecError::UnsupportedInputType(format!("i128 {i} does not fit a signed 64-bit long"))
        })
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Double(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Blob(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Blob(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<ValueMap> for Value {
    fn from(m: ValueMap) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Byte(i) => write!(f, "{i}"),
            Self::Short(i) => write!(f, "{i}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Char(c) => match char::from_u32(u32::from(*c)) {
                Some(ch) => write!(f, "'{ch}'"),
                None => write!(f, "'\\u{{{c:04X}}}'"),
            },
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
