mod job;
pub mod stream;

pub use stream::ChunkPipeline;

/// Fixed size of the chunks cut from the uncompressed stream.
///
/// Every frame payload in a compressed stream was produced from an input
/// chunk of at most this many bytes, so a chunk-sized output buffer always
/// suffices on the decompression side.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Default cap on in-flight chunk jobs per stream operation.
///
/// The window bounds both the memory held by a stream operation and the
/// parallelism it can expose, regardless of worker pool size.
pub const WINDOW_SIZE: usize = 16;
