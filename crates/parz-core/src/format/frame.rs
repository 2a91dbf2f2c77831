use crate::error::ParzError;
use crate::io::{ByteSink, ByteSource};
use crate::types::Result;

/// Size in bytes of the little-endian length prefix preceding each payload.
pub const FRAME_PREFIX_SIZE: usize = 4;

/// Writes one `length || payload` frame record to the sink.
///
/// The stream format is a bare sequence of such records terminated by end
/// of stream: no magic bytes, no codec tag, no checksum, no total length.
pub fn write_frame<S: ByteSink + ?Sized>(sink: &mut S, payload: &[u8]) -> Result<()> {
    let length = u32::try_from(payload.len()).map_err(|_| {
        ParzError::Compress("frame payload exceeds the u32 length prefix".to_string())
    })?;
    sink.write_all_bytes(&length.to_le_bytes())?;
    sink.write_all_bytes(payload)
}

/// Reads the next frame's length prefix.
///
/// Returns `None` when the source is cleanly exhausted before the first
/// prefix byte. A prefix cut short mid-read is a
/// [`ParzError::TruncatedFrame`]; a zero length is ill-formed and rejected
/// as [`ParzError::BadData`].
pub fn read_frame_len<S: ByteSource + ?Sized>(source: &mut S) -> Result<Option<u32>> {
    let mut prefix = [0u8; FRAME_PREFIX_SIZE];
    let read = source.read_some(&mut prefix)?;
    if read == 0 {
        return Ok(None);
    }
    if read != FRAME_PREFIX_SIZE {
        return Err(ParzError::TruncatedFrame("frame length prefix cut short"));
    }

    let length = u32::from_le_bytes(prefix);
    if length == 0 {
        return Err(ParzError::BadData("zero-length frame".to_string()));
    }
    Ok(Some(length))
}
