//! The codec object: configuration, compressed encode/decode, and the
//! caller's tag slot.

use bytes::BytesMut;

use crate::compress::{self, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_DECOMPRESSED_SIZE};
use crate::error::CodecError;
use crate::types::Value;
use crate::wire::{self, DEFAULT_MAX_DEPTH};

/// Tunables shared by every call on a [`Codec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// zlib level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Maximum nesting of lists and maps accepted when decoding.
    pub max_depth: usize,
    /// Maximum size of a decompressed payload, and of a payload read from
    /// a stream.
    pub max_decompressed_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_depth: DEFAULT_MAX_DEPTH,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}

/// Builder for configuring a [`Codec`].
#[derive(Debug, Default)]
pub struct CodecBuilder {
    config: CodecConfig,
    tag: Option<Value>,
}

impl CodecBuilder {
    /// Sets the zlib compression level (clamped to 9).
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level.min(9);
        self
    }

    /// Sets the maximum container nesting accepted by `decode`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Sets the maximum decompressed payload size in bytes.
    pub fn max_decompressed_size(mut self, bytes: usize) -> Self {
        self.config.max_decompressed_size = bytes;
        self
    }

    /// Sets the initial caller tag.
    pub fn tag(mut self, tag: impl Into<Value>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn build(self) -> Codec {
        Codec {
            config: self.config,
            tag: self.tag,
        }
    }
}

/// Converts values to compressed bytes and back.
///
/// A `Codec` holds no state between calls. The tag slot is caller
/// bookkeeping only and never reaches the wire.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
    tag: Option<Value>,
}

impl Codec {
    /// Creates a codec with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CodecBuilder {
        CodecBuilder::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config, tag: None }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn tag(&self) -> Option<&Value> {
        self.tag.as_ref()
    }

    pub fn set_tag(&mut self, tag: Option<Value>) {
        self.tag = tag;
    }

    pub fn take_tag(&mut self) -> Option<Value> {
        self.tag.take()
    }

    /// Encodes `value` and compresses the result.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let raw = self.to_wire(value)?;
        let compressed = compress::compress(&raw, self.config.compression_level)?;
        tracing::trace!(
            raw = raw.len(),
            compressed = compressed.len(),
            tag = value.tag(),
            "encoded value"
        );
        Ok(compressed)
    }

    /// Decompresses `bytes` and decodes the value they hold.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        let raw = compress::decompress(bytes, self.config.max_decompressed_size)
            .inspect_err(|e| tracing::debug!(error = %e, "decompression failed"))?;
        self.from_wire(&raw)
    }

    /// Encodes `value` without compression.
    pub fn to_wire(&self, value: &Value) -> Result<BytesMut, CodecError> {
        let mut buf = BytesMut::new();
        wire::encode_value(&mut buf, value)?;
        Ok(buf)
    }

    /// Decodes an uncompressed wire stream. Bytes after the first value are
    /// ignored.
    pub fn from_wire(&self, raw: &[u8]) -> Result<Value, CodecError> {
        let (value, end) = wire::decode_at(raw, 0, self.config.max_depth)
            .inspect_err(|e| tracing::debug!(error = %e, len = raw.len(), "decode failed"))?;
        if end < raw.len() {
            tracing::debug!(trailing = raw.len() - end, "ignoring bytes after top-level value");
        }
        Ok(value)
    }
}
