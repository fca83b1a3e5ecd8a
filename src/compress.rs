//! zlib framing around the wire stream.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::CodecError;

/// Default zlib level, the same one the reference serializer uses.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Default cap on the decompressed size of one payload (256 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Compresses `data` into a zlib stream. Levels above 9 are clamped.
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level.min(9)),
    );
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompresses a zlib stream.
///
/// The stream must run to its end marker and checksum; input that stops
/// short is rejected rather than returned partially. Output larger than
/// `max_size` is rejected without being fully inflated.
///
/// # Errors
///
/// [`CodecError::MalformedStream`] for corrupt, truncated or oversize input.
pub fn decompress(data: &[u8], max_size: usize) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(true);
    let cap_limit = max_size.saturating_add(1);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(64).min(cap_limit));

    loop {
        if out.len() > max_size {
            return Err(oversize(max_size));
        }
        if out.len() == out.capacity() {
            let grow = out.len().max(64).min(cap_limit - out.len());
            out.reserve(grow);
        }

        let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
        let consumed = usize::try_from(in_before).map_err(CodecError::malformed)?;
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| CodecError::MalformedStream(format!("zlib: {e}")))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() == in_before && inflater.total_out() == out_before;
                if stalled && out.len() < out.capacity() {
                    return Err(CodecError::MalformedStream(
                        "zlib stream is truncated".into(),
                    ));
                }
            }
        }
    }

    if out.len() > max_size {
        return Err(oversize(max_size));
    }

    let consumed = inflater.total_in();
    if consumed < data.len() as u64 {
        tracing::debug!(
            trailing = data.len() as u64 - consumed,
            "ignoring bytes after zlib stream end"
        );
    }
    Ok(out)
}

fn oversize(max_size: usize) -> CodecError {
    CodecError::MalformedStream(format!("decompressed size exceeds limit of {max_size} bytes"))
}
