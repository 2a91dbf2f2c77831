use crossbeam_channel::{Receiver, Sender, bounded};

use crate::types::Result;

/// One chunk's unit of work.
///
/// A job exclusively owns its input and output buffers for its whole
/// lifetime: the driver moves it into a worker closure at spawn, the
/// worker mutates it alone, and it moves back to the driver through the
/// completion channel. No buffer is ever shared across threads.
#[derive(Debug)]
pub(crate) struct Job {
    input: Vec<u8>,
    data_len: usize,
    output: Vec<u8>,
    result: Result<usize>,
}

impl Job {
    /// Builds a job over the filled `data_len`-byte prefix of `input`,
    /// with an output buffer of `output_capacity` bytes.
    pub(crate) fn new(input: Vec<u8>, data_len: usize, output_capacity: usize) -> Self {
        debug_assert!(data_len <= input.len());
        Self {
            input,
            data_len,
            output: vec![0u8; output_capacity],
            result: Ok(0),
        }
    }

    /// Borrows the job's data slice and output buffer for one codec call.
    pub(crate) fn buffers(&mut self) -> (&[u8], &mut [u8]) {
        (&self.input[..self.data_len], &mut self.output[..])
    }

    /// Records the codec call's outcome.
    pub(crate) fn set_result(&mut self, result: Result<usize>) {
        self.result = result;
    }

    /// Consumes the job, yielding its output buffer and the bytes written
    /// into it, or the failure recorded by the worker.
    pub(crate) fn finish(self) -> Result<(Vec<u8>, usize)> {
        let written = self.result?;
        Ok((self.output, written))
    }
}

pub(crate) type JobSender = Sender<Job>;
pub(crate) type JobReceiver = Receiver<Job>;

/// One-shot completion event carrying the finished job back to the driver.
///
/// A bounded channel of capacity one: the worker sends exactly once, the
/// driver receives exactly once, and the channel's ordering guarantees
/// make every worker write to the job visible to the driver.
pub(crate) fn completion_channel() -> (JobSender, JobReceiver) {
    bounded(1)
}
