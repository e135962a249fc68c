//! Error types for the poll pipeline.
//!
//! # Design
//! Each pipeline stage has its own enum so the orchestrator can log the
//! specific reason a poll attempt died. Everything folds into [`PollError`]
//! at the orchestrator boundary; every variant except `TransportInit` is
//! recoverable and converted into a scheduled retry.

use thiserror::Error;

/// Errors from [`crate::ResponseAssembler`] while reassembling a body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// The response used chunked transfer encoding, which the assembler
    /// cannot size a buffer for. The next response may well not be chunked.
    #[error("chunked transfer encoding is not supported")]
    ChunkedEncoding,

    /// Data arrived before any `content-length` header was seen.
    #[error("response did not declare a content length")]
    MissingContentLength,

    /// The buffer reservation for the declared length failed.
    #[error("could not reserve {0} bytes for the response body")]
    OutOfMemory(usize),

    /// A chunk would have written past the declared length.
    #[error("data overruns declared content length ({received} + {chunk} > {declared})")]
    BufferOverrun {
        declared: usize,
        received: usize,
        chunk: usize,
    },

    /// The response finished with fewer bytes than declared.
    #[error("body incomplete: received {received} of {declared} bytes")]
    IncompleteBody { declared: usize, received: usize },
}

/// Errors from [`crate::tokenizer::tokenize`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// A byte that cannot start or continue any JSON value, or a second
    /// top-level value after the root.
    #[error("invalid character {byte:#04x} at offset {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    /// Input ended inside a string, literal, or unclosed container.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// The caller-supplied token capacity was exhausted.
    #[error("document exceeds the token capacity of {0}")]
    TooManyTokens(usize),
}

/// Errors from [`crate::extract::last_array_element_field`].
///
/// These describe a well-formed document with an unexpected shape. The poll
/// loop treats them as a miss: logged, cursor untouched, next poll issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The document's root value is not an object.
    #[error("root value is not an object")]
    UnexpectedRoot,

    /// The named key is present but its value is not an array.
    #[error("\"{0}\" is not an array")]
    ExpectedArray(String),

    /// The array's last element is not an object.
    #[error("last element of \"{0}\" is not an object")]
    ExpectedObject(String),

    /// The last element carries no key matching the requested field.
    #[error("\"{0}\" not found in the last element")]
    MissingField(String),
}

/// Failure to create a transport handle at all.
///
/// Distinct from an ordinary connect error delivered as
/// [`crate::HttpEvent::Error`]: a handle that cannot even be constructed is
/// not retried in place. [`crate::Poller::run`] propagates it so the
/// supervising layer can restart the component.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportInitError(pub String);

/// Any way a single poll attempt can fail, folded at the orchestrator
/// boundary.
#[derive(Debug, Error)]
pub enum PollError {
    /// The transport handle could not be created. Fatal.
    #[error("transport unavailable: {0}")]
    TransportInit(String),

    /// Connect failure, timeout, read failure, or a disconnect before the
    /// body was complete.
    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The extracted field text is not a base-10 unsigned integer.
    #[error("update_id is not an unsigned integer: {0:?}")]
    InvalidUpdateId(String),
}

impl From<TransportInitError> for PollError {
    fn from(err: TransportInitError) -> Self {
        PollError::TransportInit(err.0)
    }
}

impl PollError {
    /// Whether this error should stop the poll loop instead of scheduling a
    /// retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PollError::TransportInit(_))
    }
}
