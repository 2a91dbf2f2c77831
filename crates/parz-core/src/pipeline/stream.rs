use std::collections::VecDeque;
use std::sync::Arc;

use crate::codec::{Codec, ContextPool, PoolMetricsSnapshot};
use crate::core::WorkerPool;
use crate::error::ParzError;
use crate::format;
use crate::io::{ByteSink, ByteSource};
use crate::pipeline::job::{Job, JobReceiver, JobSender, completion_channel};
use crate::pipeline::{CHUNK_SIZE, WINDOW_SIZE};
use crate::types::{CodecKind, CompressStats, DecompressStats, Result};

/// Parallel chunked compression pipeline over one codec.
///
/// [`compress`](ChunkPipeline::compress) and
/// [`decompress`](ChunkPipeline::decompress) drive a bounded window of
/// in-flight chunk jobs across the shared worker pool while emitting
/// output strictly in input order: the FIFO of in-flight jobs doubles as
/// the ordering structure, because only the head job's result is ever
/// written. Backpressure is intrinsic; once the window is full the driver
/// stops reading until the head job completes.
///
/// The pipeline owns a context pool per direction. Contexts are created
/// lazily at the configured level, recycled across chunks and across
/// stream operations, and all destroyed when the pipeline is dropped (the
/// borrow checker rules out dropping it while an operation is in flight).
pub struct ChunkPipeline<C: Codec> {
    shared: Arc<PipelineShared<C>>,
    pool: Arc<WorkerPool>,
    window_size: usize,
}

struct PipelineShared<C: Codec> {
    codec: C,
    compressors: ContextPool<C::Compressor>,
    decompressors: ContextPool<C::Decompressor>,
}

impl<C: Codec> ChunkPipeline<C> {
    /// Creates a pipeline with the default [`WINDOW_SIZE`] window.
    pub fn new(codec: C, pool: Arc<WorkerPool>) -> Self {
        Self::with_window(codec, pool, WINDOW_SIZE)
    }

    /// Creates a pipeline with an explicit in-flight window size.
    pub fn with_window(codec: C, pool: Arc<WorkerPool>, window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            shared: Arc::new(PipelineShared {
                codec,
                compressors: ContextPool::new(window_size),
                decompressors: ContextPool::new(window_size),
            }),
            pool,
            window_size,
        }
    }

    /// Codec kind this pipeline was configured with.
    pub fn kind(&self) -> CodecKind {
        self.shared.codec.kind()
    }

    /// Maximum number of in-flight chunk jobs per stream operation.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Metrics for the compression context pool.
    pub fn compressor_metrics(&self) -> PoolMetricsSnapshot {
        self.shared.compressors.metrics()
    }

    /// Metrics for the decompression context pool.
    pub fn decompressor_metrics(&self) -> PoolMetricsSnapshot {
        self.shared.decompressors.metrics()
    }

    /// Compresses `source` to `sink` as a sequence of length-prefixed
    /// frames, one frame per input chunk.
    ///
    /// On error the sink may hold a valid prefix of the stream; the engine
    /// never truncates or rolls back. Every already-spawned job is awaited
    /// before the first error is returned.
    pub fn compress<R, W>(&self, source: &mut R, sink: &mut W) -> Result<CompressStats>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        let mut in_flight = VecDeque::with_capacity(self.window_size);
        let result = self.drive_compress(source, sink, &mut in_flight);
        drain_in_flight(&mut in_flight);
        result
    }

    /// Decompresses a frame sequence from `source`, writing the recovered
    /// bytes to `sink`.
    ///
    /// The source must have been produced by [`compress`] on a pipeline
    /// with the same codec kind; the format is private to this engine and
    /// carries no self-description.
    ///
    /// [`compress`]: ChunkPipeline::compress
    pub fn decompress<R, W>(&self, source: &mut R, sink: &mut W) -> Result<DecompressStats>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        let mut in_flight = VecDeque::with_capacity(self.window_size);
        let result = self.drive_decompress(source, sink, &mut in_flight);
        drain_in_flight(&mut in_flight);
        result
    }

    fn drive_compress<R, W>(
        &self,
        source: &mut R,
        sink: &mut W,
        in_flight: &mut VecDeque<JobReceiver>,
    ) -> Result<CompressStats>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        // One bound for the full chunk size covers every shorter final
        // chunk as well.
        let output_bound = self.shared.codec.compress_bound(CHUNK_SIZE);
        let mut stats = CompressStats::default();
        let mut eof = false;

        while !(eof && in_flight.is_empty()) {
            while in_flight.len() < self.window_size && !eof {
                let mut input = vec![0u8; CHUNK_SIZE];
                let read = source.read_some(&mut input)?;
                if read == 0 {
                    eof = true;
                    break;
                }
                stats.chunks += 1;
                stats.bytes_in += read as u64;

                let job = Job::new(input, read, output_bound);
                let (done_tx, done_rx) = completion_channel();
                let shared = Arc::clone(&self.shared);
                self.pool
                    .spawn(move || run_compress(&shared, job, done_tx))?;
                in_flight.push_back(done_rx);
            }

            if let Some(done) = in_flight.pop_front() {
                let (output, written) = recv_job(done)?.finish()?;
                format::write_frame(sink, &output[..written])?;
                stats.bytes_out += (format::FRAME_PREFIX_SIZE + written) as u64;
            }
        }

        tracing::debug!(
            chunks = stats.chunks,
            bytes_in = stats.bytes_in,
            bytes_out = stats.bytes_out,
            "compress stream finished"
        );
        Ok(stats)
    }

    fn drive_decompress<R, W>(
        &self,
        source: &mut R,
        sink: &mut W,
        in_flight: &mut VecDeque<JobReceiver>,
    ) -> Result<DecompressStats>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        let mut stats = DecompressStats::default();
        let mut eof = false;

        while !(eof && in_flight.is_empty()) {
            while in_flight.len() < self.window_size && !eof {
                let Some(length) = format::read_frame_len(source)? else {
                    eof = true;
                    break;
                };
                let length = length as usize;
                let mut input = vec![0u8; length];
                source.read_exact_bytes(&mut input, "frame payload cut short")?;
                stats.frames += 1;
                stats.bytes_in += (format::FRAME_PREFIX_SIZE + length) as u64;

                let job = Job::new(input, length, CHUNK_SIZE);
                let (done_tx, done_rx) = completion_channel();
                let shared = Arc::clone(&self.shared);
                self.pool
                    .spawn(move || run_decompress(&shared, job, done_tx))?;
                in_flight.push_back(done_rx);
            }

            if let Some(done) = in_flight.pop_front() {
                let (output, written) = recv_job(done)?.finish()?;
                sink.write_all_bytes(&output[..written])?;
                stats.bytes_out += written as u64;
            }
        }

        tracing::debug!(
            frames = stats.frames,
            bytes_in = stats.bytes_in,
            bytes_out = stats.bytes_out,
            "decompress stream finished"
        );
        Ok(stats)
    }
}

fn run_compress<C: Codec>(shared: &PipelineShared<C>, mut job: Job, done: JobSender) {
    let result = compress_job(shared, &mut job);
    job.set_result(result);
    let _ = done.send(job);
}

fn run_decompress<C: Codec>(shared: &PipelineShared<C>, mut job: Job, done: JobSender) {
    let result = decompress_job(shared, &mut job);
    job.set_result(result);
    let _ = done.send(job);
}

fn compress_job<C: Codec>(shared: &PipelineShared<C>, job: &mut Job) -> Result<usize> {
    let mut ctx = shared
        .compressors
        .acquire_with(|| shared.codec.new_compressor())?;
    let (input, output) = job.buffers();
    let result = shared.codec.compress(&mut ctx, input, output);
    match &result {
        Ok(_) => shared.compressors.release(ctx),
        // Codec state is suspect after a failed call; destroy the context
        // instead of recycling it.
        Err(_) => shared.compressors.discard(ctx),
    }
    result
}

fn decompress_job<C: Codec>(shared: &PipelineShared<C>, job: &mut Job) -> Result<usize> {
    let mut ctx = shared
        .decompressors
        .acquire_with(|| shared.codec.new_decompressor())?;
    let (input, output) = job.buffers();
    let result = shared.codec.decompress(&mut ctx, input, output);
    match &result {
        Ok(_) => shared.decompressors.release(ctx),
        Err(_) => shared.decompressors.discard(ctx),
    }
    result
}

fn recv_job(done: JobReceiver) -> Result<Job> {
    done.recv()
        .map_err(|_| ParzError::PoolUnavailable("chunk worker exited before completing its job"))
}

/// Waits for every remaining in-flight job before the stream operation
/// returns, so that no worker is left running against a half-torn-down
/// operation and the first error wins deterministically.
fn drain_in_flight(in_flight: &mut VecDeque<JobReceiver>) {
    for done in in_flight.drain(..) {
        let _ = done.recv();
    }
}
