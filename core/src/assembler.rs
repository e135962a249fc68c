//! Incremental response body reassembly.
//!
//! # Design
//! The transport delivers the body as an arbitrary sequence of chunks. The
//! assembler sizes one buffer from the declared `content-length`, copies
//! each chunk at the write cursor with an explicit bounds check, and hands
//! the completed buffer over on finish. Chunked responses are rejected
//! outright: without a declared total length there is nothing to size the
//! buffer from, and the next poll's response may not be chunked. Every
//! terminal or error path clears internal state so nothing leaks into the
//! next attempt.

use crate::error::AssembleError;

/// An owned body buffer with its declared total length.
///
/// Invariant: the number of bytes written never exceeds `declared_len`, and
/// the storage is reserved exactly once, when the declared length becomes
/// known.
#[derive(Debug)]
pub struct ResponseBuffer {
    declared_len: usize,
    bytes: Vec<u8>,
}

impl ResponseBuffer {
    fn new(declared_len: usize) -> Result<Self, AssembleError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(declared_len)
            .map_err(|_| AssembleError::OutOfMemory(declared_len))?;
        Ok(Self {
            declared_len,
            bytes,
        })
    }

    fn write(&mut self, chunk: &[u8]) -> Result<(), AssembleError> {
        if self.bytes.len() + chunk.len() > self.declared_len {
            return Err(AssembleError::BufferOverrun {
                declared: self.declared_len,
                received: self.bytes.len(),
                chunk: chunk.len(),
            });
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.bytes.len() == self.declared_len
    }

    fn received(&self) -> usize {
        self.bytes.len()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Accumulates transport data events into one contiguous, exactly-sized
/// body.
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    declared_len: Option<usize>,
    chunked: bool,
    buf: Option<ResponseBuffer>,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The connection was established; start from a clean slate.
    pub fn on_connect(&mut self) {
        self.reset();
    }

    /// Record a response header. Only `content-length` and
    /// `transfer-encoding` matter here; everything else passes by.
    pub fn on_header(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("content-length") {
            self.declared_len = value.trim().parse().ok();
            log::debug!("content-length: {}", value.trim());
        } else if name.eq_ignore_ascii_case("transfer-encoding")
            && value.to_ascii_lowercase().contains("chunked")
        {
            self.chunked = true;
        }
    }

    /// Copy one chunk at the write cursor.
    ///
    /// The first chunk triggers the single buffer reservation; a chunked
    /// response or a missing declared length is rejected here, matching the
    /// point where the data actually forces the decision.
    pub fn on_data(&mut self, chunk: &[u8]) -> Result<(), AssembleError> {
        if self.chunked {
            self.reset();
            return Err(AssembleError::ChunkedEncoding);
        }
        if self.buf.is_none() {
            let declared = match self.declared_len {
                Some(len) => len,
                None => {
                    self.reset();
                    return Err(AssembleError::MissingContentLength);
                }
            };
            match ResponseBuffer::new(declared) {
                Ok(buf) => self.buf = Some(buf),
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            }
        }
        let Some(buf) = self.buf.as_mut() else {
            return Err(AssembleError::MissingContentLength);
        };
        if let Err(err) = buf.write(chunk) {
            self.reset();
            return Err(err);
        }
        Ok(())
    }

    /// The response completed; hand the body over if it is exactly the
    /// declared size.
    pub fn on_finish(&mut self) -> Result<Vec<u8>, AssembleError> {
        let result = match self.buf.take() {
            Some(buf) if buf.is_complete() => Ok(buf.into_bytes()),
            Some(buf) => Err(AssembleError::IncompleteBody {
                declared: buf.declared_len,
                received: buf.received(),
            }),
            // A zero-length body never produces a data event.
            None if self.declared_len.unwrap_or(0) == 0 => Ok(Vec::new()),
            None => Err(AssembleError::IncompleteBody {
                declared: self.declared_len.unwrap_or(0),
                received: 0,
            }),
        };
        self.reset();
        result
    }

    /// Discard any partial body after a transport error.
    pub fn on_error(&mut self) {
        self.reset();
    }

    /// Discard any partial body after a disconnect.
    pub fn on_disconnect(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.declared_len = None;
        self.chunked = false;
        self.buf = None;
    }
}
