use zstd::bulk::{Compressor, Decompressor};
use zstd::zstd_safe;

use crate::codec::Codec;
use crate::error::ParzError;
use crate::types::{CodecKind, CompressionLevel, Result};

const MIN_LEVEL: i32 = 1;
const MAX_LEVEL: i32 = 22;

/// Zstandard codec backed by the zstd bulk (one-shot frame) API.
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn new(level: CompressionLevel) -> Self {
        Self {
            level: map_level(level),
        }
    }

    /// Native zstd level this codec allocates contexts at.
    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new(CompressionLevel::Default)
    }
}

/// Maps symbolic presets onto zstd's native 1-22 range; explicit levels
/// are clamped into that range.
fn map_level(level: CompressionLevel) -> i32 {
    match level {
        CompressionLevel::Fastest => 1,
        CompressionLevel::Fast => 3,
        CompressionLevel::Default => 9,
        CompressionLevel::Good => 19,
        CompressionLevel::Best => 22,
        CompressionLevel::Explicit(n) => n.clamp(MIN_LEVEL, MAX_LEVEL),
    }
}

impl Codec for ZstdCodec {
    type Compressor = Compressor<'static>;
    type Decompressor = Decompressor<'static>;

    fn kind(&self) -> CodecKind {
        CodecKind::Zstd
    }

    fn new_compressor(&self) -> Result<Self::Compressor> {
        Compressor::new(self.level)
            .map_err(|err| ParzError::CodecInit(format!("zstd compressor: {err}")))
    }

    fn new_decompressor(&self) -> Result<Self::Decompressor> {
        Decompressor::new()
            .map_err(|err| ParzError::CodecInit(format!("zstd decompressor: {err}")))
    }

    fn compress_bound(&self, input_len: usize) -> usize {
        zstd_safe::compress_bound(input_len)
    }

    fn compress(
        &self,
        ctx: &mut Self::Compressor,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize> {
        ctx.compress_to_buffer(input, output)
            .map_err(|err| ParzError::Compress(format!("zstd encode failed: {err}")))
    }

    fn decompress(
        &self,
        ctx: &mut Self::Decompressor,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize> {
        ctx.decompress_to_buffer(input, output)
            .map_err(|err| ParzError::BadData(format!("zstd decode failed: {err}")))
    }
}
