use serde::{Deserialize, Serialize};

use crate::error::ParzError;

pub type Result<T> = std::result::Result<T, ParzError>;

/// Codec family used for every chunk payload in a stream.
///
/// The first three share one deflate-family implementation and differ only
/// in the framing wrapped around each payload; `Zstd` is a distinct codec.
/// A compressed stream carries no codec tag, so the reader must be
/// configured with the same kind as the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecKind {
    Deflate,
    Gzip,
    Zlib,
    Zstd,
}

/// Compression effort, scaled to each codec's native level range at
/// context-allocation time.
///
/// `Explicit` levels are clamped into the codec's native range rather than
/// rejected; the mapping is codec-private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompressionLevel {
    Fastest,
    Fast,
    #[default]
    Default,
    Good,
    Best,
    Explicit(i32),
}

/// Accounting for one finished compression stream operation.
///
/// `bytes_out` counts payload bytes plus the frame length prefixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressStats {
    pub chunks: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Accounting for one finished decompression stream operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompressStats {
    pub frames: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}
