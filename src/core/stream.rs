//! # Stream Adapters
//!
//! Sink and source wrappers used when an envelope is written to, or read from,
//! something other than an in-memory buffer.
//!
//! Errors never escape as panics. [`ProtocolWriter`] carries the outcome of
//! its writes through a chain of calls: after the first failure every later
//! write is skipped and [`ProtocolWriter::finish`] hands back that first
//! error. [`ProtocolReader`] fails every call after its first failure without
//! touching the source again.
//!
//! ```rust,no_run
//! use config_envelope::core::stream::ProtocolWriter;
//!
//! let sink = ProtocolWriter::new(Vec::new())
//!     .write(b"header")
//!     .write(b"payload")
//!     .finish();
//! assert_eq!(sink.unwrap(), b"headerpayload".to_vec());
//! ```

use crate::error::{EnvelopeError, Result};
use std::io::{Read, Write};
use tracing::warn;

/// Chainable writer that stops at the first failed write.
#[derive(Debug)]
pub struct ProtocolWriter<W> {
    inner: W,
    status: Result<()>,
    bytes_written: usize,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            status: Ok(()),
            bytes_written: 0,
        }
    }

    /// Write all of `bytes`, unless an earlier write already failed
    pub fn write(mut self, bytes: &[u8]) -> Self {
        if self.status.is_ok() {
            match self.inner.write_all(bytes) {
                Ok(()) => self.bytes_written += bytes.len(),
                Err(e) => {
                    warn!(error = %e, written = self.bytes_written, "Sink write failed");
                    self.status = Err(EnvelopeError::Io(e));
                }
            }
        }
        self
    }

    /// Record a failure that happened before any bytes reached the sink.
    /// Later writes are skipped.
    pub fn fail(mut self, err: EnvelopeError) -> Self {
        if self.status.is_ok() {
            self.status = Err(err);
        }
        self
    }

    /// True while no write has failed
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Flush and return the sink, or the first error encountered
    pub fn finish(mut self) -> Result<W> {
        self.status?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Reader that stays failed once any read has failed.
#[derive(Debug)]
pub struct ProtocolReader<R> {
    inner: R,
    failed: bool,
    bytes_read: usize,
}

impl<R: Read> ProtocolReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            failed: false,
            bytes_read: 0,
        }
    }

    /// Read exactly `n` bytes.
    ///
    /// # Errors
    /// Returns `EnvelopeError::Io` if the source fails or ends early, and
    /// `EnvelopeError::StreamFailed` for every call after a failure
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` completely from the source
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.failed {
            return Err(EnvelopeError::StreamFailed);
        }
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.bytes_read += buf.len();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, read = self.bytes_read, "Source read failed");
                self.failed = true;
                Err(EnvelopeError::Io(e))
            }
        }
    }

    /// Put the reader into the failed state after a validation error on
    /// data it produced
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
