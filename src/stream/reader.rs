//! Reads an encoded value from an async byte stream.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::Codec;
use crate::error::CodecError;
use crate::types::Value;

/// Reads a compressed value from an `AsyncRead` stream.
pub struct ValueReader<R> {
    reader: R,
    codec: Codec,
}

impl<R: AsyncRead + Unpin> ValueReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_codec(reader, Codec::new())
    }

    pub fn with_codec(reader: R, codec: Codec) -> Self {
        Self { reader, codec }
    }

    /// Reads the stream to EOF and decodes the value it holds.
    ///
    /// Input longer than the codec's decompressed-size limit is rejected
    /// without reading past the limit.
    pub async fn read_value(&mut self) -> Result<Value, CodecError> {
        let limit = self.codec.config().max_decompressed_size;
        let mut data = Vec::new();
        (&mut self.reader)
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut data)
            .await?;
        if data.len() > limit {
            return Err(CodecError::MalformedStream(format!(
                "input exceeds limit of {limit} bytes"
            )));
        }
        tracing::trace!(len = data.len(), "read encoded value");
        self.codec.decode(&data)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
