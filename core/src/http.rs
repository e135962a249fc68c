//! Transport seam for the host-does-IO pattern.
//!
//! # Design
//! The core never opens a socket. The host implements [`Transport`] and
//! [`Connection`], and the poll loop consumes the connection's lifecycle as
//! a sequence of [`HttpEvent`]s pulled from an explicit blocking
//! [`Connection::next_event`] call. This replaces re-entrant callback
//! dispatch with a single suspension point and keeps the whole cycle
//! single-threaded.

use std::time::Duration;

use crate::error::TransportInitError;

/// One step of an HTTP request's lifecycle, delivered by the transport as a
/// read-only notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpEvent {
    /// The connection to the server was established.
    Connected,
    /// The request headers went out.
    HeadersSent,
    /// One response header arrived. `content-length` and
    /// `transfer-encoding` must be delivered before the first `DataChunk`.
    HeaderReceived { name: String, value: String },
    /// A piece of the response body arrived.
    DataChunk(Vec<u8>),
    /// The response completed normally. Terminal.
    Finished,
    /// The connection closed. Terminal.
    Disconnected,
    /// The request failed (connect, timeout, read). Terminal.
    Error(String),
}

/// Parameters for one poll request, as plain data.
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub url: String,
    pub timeout: Duration,
    pub max_redirects: u32,
    pub user_agent: String,
}

/// Factory for per-attempt connections.
///
/// A handle is created immediately before each poll attempt and dropped
/// immediately after it, so at most one request is ever in flight. A
/// `connect` failure means no handle could be constructed at all, which the
/// poll loop treats as fatal rather than retryable.
pub trait Transport {
    type Conn: Connection;

    fn connect(&mut self, request: &PollRequest) -> Result<Self::Conn, TransportInitError>;
}

/// A single in-flight request.
///
/// `next_event` blocks until the next lifecycle notification. After a
/// terminal event (`Finished`, `Disconnected`, `Error`) the caller stops
/// polling and drops the handle; teardown is the drop.
pub trait Connection {
    fn next_event(&mut self) -> HttpEvent;
}
