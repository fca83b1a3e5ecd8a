//! Writes an encoded value to an async byte stream.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::Codec;
use crate::error::CodecError;
use crate::types::Value;

/// Writes compressed values to an `AsyncWrite` stream.
pub struct ValueWriter<W> {
    writer: W,
    codec: Codec,
}

impl<W: AsyncWrite + Unpin> ValueWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_codec(writer, Codec::new())
    }

    pub fn with_codec(writer: W, codec: Codec) -> Self {
        Self { writer, codec }
    }

    /// Encodes `value`, writes the compressed bytes and flushes.
    ///
    /// Returns the number of bytes written. Nothing is written if encoding
    /// fails.
    pub async fn write_value(&mut self, value: &Value) -> Result<usize, CodecError> {
        let bytes = self.codec.encode(value)?;
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(bytes.len())
    }

    /// Flushes the underlying writer.
    pub async fn flush(&mut self) -> Result<(), CodecError> {
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
