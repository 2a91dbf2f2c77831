use std::io::{ErrorKind, Read, Write};

use crate::error::ParzError;
use crate::types::Result;

/// Byte producer feeding a stream operation.
///
/// Implemented for every [`std::io::Read`]. The driver thread is the only
/// caller, so implementations need no internal synchronisation.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes into `buf`, filling as much of it as
    /// the stream can provide, and returns the number of bytes read.
    ///
    /// Zero means a clean end of stream; a short count can only happen on
    /// the final read before that.
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Reads exactly `buf.len()` bytes or fails with
    /// [`ParzError::TruncatedFrame`] carrying `what`.
    fn read_exact_bytes(&mut self, buf: &mut [u8], what: &'static str) -> Result<()> {
        if self.read_some(buf)? != buf.len() {
            return Err(ParzError::TruncatedFrame(what));
        }
        Ok(())
    }
}

impl<R: Read + ?Sized> ByteSource for R {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ParzError::SourceIo(err)),
            }
        }
        Ok(filled)
    }
}

/// Byte consumer receiving a stream operation's output.
///
/// Implemented for every [`std::io::Write`].
pub trait ByteSink {
    /// Writes all of `buf` or fails with [`ParzError::SinkIo`].
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<()>;
}

impl<W: Write + ?Sized> ByteSink for W {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf).map_err(ParzError::SinkIo)
    }
}
