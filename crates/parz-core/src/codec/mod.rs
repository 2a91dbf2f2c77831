use crate::types::{CodecKind, Result};

pub mod deflate;
pub mod pool;
pub mod zstd;

pub use self::deflate::{DeflateCodec, DeflateCompressor, DeflateDecompressor, DeflateFraming};
pub use self::pool::{ContextPool, PoolMetricsSnapshot};
pub use self::zstd::ZstdCodec;

/// Uniform one-shot interface over an external codec library.
///
/// A codec value carries its configuration (framing, level); the contexts
/// it allocates are pooled by the pipeline and reused across chunks, so
/// every `compress`/`decompress` call must leave its context ready for the
/// next chunk. Calls are pure over their inputs: compressing the same
/// bytes on any context of the same codec yields identical output.
pub trait Codec: Send + Sync + 'static {
    /// Reusable compression context.
    type Compressor: Send + 'static;
    /// Reusable decompression context.
    type Decompressor: Send + 'static;

    /// Tag identifying the codec family and per-payload framing.
    fn kind(&self) -> CodecKind;

    /// Allocates a compression context at the configured level.
    fn new_compressor(&self) -> Result<Self::Compressor>;

    /// Allocates a decompression context.
    fn new_decompressor(&self) -> Result<Self::Decompressor>;

    /// Upper bound on the compressed size of `input_len` uncompressed
    /// bytes, framing included.
    fn compress_bound(&self, input_len: usize) -> usize;

    /// Compresses `input` into `output` and returns the bytes written.
    ///
    /// `output` must hold at least
    /// [`compress_bound(input.len())`](Codec::compress_bound) bytes.
    fn compress(
        &self,
        ctx: &mut Self::Compressor,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize>;

    /// Decompresses one frame payload into `output` and returns the bytes
    /// written. Fails with [`crate::ParzError::BadData`] when the payload
    /// does not decode or does not fit in `output`.
    fn decompress(
        &self,
        ctx: &mut Self::Decompressor,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize>;
}
