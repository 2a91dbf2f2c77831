pub mod codec;
pub mod core;
pub mod error;
pub mod format;
pub mod io;
pub mod pipeline;
pub mod types;

pub use codec::{
    Codec, ContextPool, DeflateCodec, DeflateCompressor, DeflateDecompressor, DeflateFraming,
    PoolMetricsSnapshot, ZstdCodec,
};
pub use crate::core::WorkerPool;
pub use error::ParzError;
pub use format::{FRAME_PREFIX_SIZE, read_frame_len, write_frame};
pub use io::{ByteSink, ByteSource};
pub use pipeline::{CHUNK_SIZE, ChunkPipeline, WINDOW_SIZE};
pub use types::{CodecKind, CompressStats, CompressionLevel, DecompressStats, Result};
