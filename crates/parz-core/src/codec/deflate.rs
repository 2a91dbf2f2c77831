use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::codec::Codec;
use crate::error::ParzError;
use crate::types::{CodecKind, CompressionLevel, Result};

const MIN_LEVEL: i32 = 1;
const MAX_LEVEL: i32 = 9;

/// Framing wrapped around each payload by the deflate family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflateFraming {
    /// Bare deflate bitstream, no header or checksum.
    Raw,
    /// Gzip member per payload (10-byte header, CRC32 trailer).
    Gzip,
    /// Zlib wrapper per payload (2-byte header, Adler-32 trailer).
    Zlib,
}

/// Deflate-family codec backed by flate2.
///
/// One implementation covers the raw, gzip, and zlib kinds; the framing
/// and level are fixed per instance and baked into every context it
/// allocates.
#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    framing: DeflateFraming,
    level: Compression,
}

impl DeflateCodec {
    pub fn new(framing: DeflateFraming, level: CompressionLevel) -> Self {
        Self {
            framing,
            level: Compression::new(map_level(level)),
        }
    }

    /// Creates a codec for one of the deflate-family kinds.
    ///
    /// Returns `None` for [`CodecKind::Zstd`].
    pub fn for_kind(kind: CodecKind, level: CompressionLevel) -> Option<Self> {
        let framing = match kind {
            CodecKind::Deflate => DeflateFraming::Raw,
            CodecKind::Gzip => DeflateFraming::Gzip,
            CodecKind::Zlib => DeflateFraming::Zlib,
            CodecKind::Zstd => return None,
        };
        Some(Self::new(framing, level))
    }

    pub fn framing(&self) -> DeflateFraming {
        self.framing
    }

    /// Native flate2 level this codec allocates contexts at.
    pub fn level(&self) -> u32 {
        self.level.level()
    }
}

/// Maps symbolic presets onto flate2's native 1-9 range; explicit levels
/// are clamped into that range.
fn map_level(level: CompressionLevel) -> u32 {
    match level {
        CompressionLevel::Fastest => 1,
        CompressionLevel::Fast => 3,
        CompressionLevel::Default => 6,
        CompressionLevel::Good => 8,
        CompressionLevel::Best => 9,
        CompressionLevel::Explicit(n) => n.clamp(MIN_LEVEL, MAX_LEVEL) as u32,
    }
}

/// Pooled flate2 compression context.
pub struct DeflateCompressor {
    inner: Compress,
}

/// Pooled flate2 decompression context.
pub struct DeflateDecompressor {
    inner: Decompress,
    framing: DeflateFraming,
}

impl DeflateDecompressor {
    fn rearm(&mut self) {
        match self.framing {
            DeflateFraming::Raw => self.inner.reset(false),
            DeflateFraming::Zlib => self.inner.reset(true),
            // flate2 has no gzip-preserving reset; rebuild the state.
            DeflateFraming::Gzip => self.inner = Decompress::new_gzip(15),
        }
    }
}

impl Codec for DeflateCodec {
    type Compressor = DeflateCompressor;
    type Decompressor = DeflateDecompressor;

    fn kind(&self) -> CodecKind {
        match self.framing {
            DeflateFraming::Raw => CodecKind::Deflate,
            DeflateFraming::Gzip => CodecKind::Gzip,
            DeflateFraming::Zlib => CodecKind::Zlib,
        }
    }

    fn new_compressor(&self) -> Result<Self::Compressor> {
        let inner = match self.framing {
            DeflateFraming::Raw => Compress::new(self.level, false),
            DeflateFraming::Zlib => Compress::new(self.level, true),
            DeflateFraming::Gzip => Compress::new_gzip(self.level, 15),
        };
        Ok(DeflateCompressor { inner })
    }

    fn new_decompressor(&self) -> Result<Self::Decompressor> {
        let inner = match self.framing {
            DeflateFraming::Raw => Decompress::new(false),
            DeflateFraming::Zlib => Decompress::new(true),
            DeflateFraming::Gzip => Decompress::new_gzip(15),
        };
        Ok(DeflateDecompressor {
            inner,
            framing: self.framing,
        })
    }

    fn compress_bound(&self, input_len: usize) -> usize {
        // zlib's compressBound slack covers the stored-block worst case;
        // the gzip wrapper needs 18 extra bytes over the raw bitstream.
        let slack = (input_len >> 12) + (input_len >> 14) + (input_len >> 25) + 13;
        let framing = match self.framing {
            DeflateFraming::Raw => 0,
            DeflateFraming::Zlib => 6,
            DeflateFraming::Gzip => 18,
        };
        input_len + slack + framing
    }

    fn compress(
        &self,
        ctx: &mut Self::Compressor,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize> {
        ctx.inner.reset();
        let status = ctx
            .inner
            .compress(input, output, FlushCompress::Finish)
            .map_err(|err| ParzError::Compress(format!("deflate encode failed: {err}")))?;

        match status {
            Status::StreamEnd if ctx.inner.total_in() == input.len() as u64 => {
                Ok(ctx.inner.total_out() as usize)
            }
            _ => Err(ParzError::Compress(
                "deflate encode stopped before the end of the chunk".to_string(),
            )),
        }
    }

    fn decompress(
        &self,
        ctx: &mut Self::Decompressor,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize> {
        ctx.rearm();
        let status = ctx
            .inner
            .decompress(input, output, FlushDecompress::Finish)
            .map_err(|err| ParzError::BadData(format!("deflate decode failed: {err}")))?;

        match status {
            Status::StreamEnd => Ok(ctx.inner.total_out() as usize),
            // Either the payload is cut short or it inflates past the
            // chunk-sized output buffer; both mean a foreign or damaged
            // frame.
            _ => Err(ParzError::BadData(
                "deflate payload did not reach the end of its stream".to_string(),
            )),
        }
    }
}
