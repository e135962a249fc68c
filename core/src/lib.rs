//! Long-poll client core for a Telegram-style Bot API.
//!
//! # Overview
//! Repeatedly fetches `getUpdates`, reassembles the length-prefixed response
//! body from transport lifecycle events, extracts the `update_id` of the
//! newest element in the `result` array, and carries it forward as the next
//! request's `offset` so already-seen updates are never fetched twice.
//!
//! # Design
//! - The core performs no network I/O. The caller supplies a [`Transport`]
//!   that yields [`HttpEvent`]s from an explicit blocking poll point, keeping
//!   the pipeline deterministic and testable against scripted event streams.
//! - The response body is consumed by a bounded-capacity span tokenizer
//!   rather than a parse tree; the extractor walks tokens and skips sibling
//!   subtrees using the tokenizer's container-span contract.
//! - One connection exists at a time. Every attempt creates a fresh handle
//!   and drops it before the next one, so buffer, token, and cursor state are
//!   exclusively owned by the cycle in flight.
//! - Recoverable failures are logged and retried after a fixed delay; only a
//!   transport-handle creation failure escapes [`Poller::run`].

pub mod assembler;
pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod http;
pub mod poller;
pub mod tokenizer;

pub use assembler::ResponseAssembler;
pub use client::UpdatesClient;
pub use config::PollConfig;
pub use cursor::PollCursor;
pub use error::{AssembleError, ExtractError, PollError, TokenizeError, TransportInitError};
pub use http::{Connection, HttpEvent, PollRequest, Transport};
pub use poller::{PollOutcome, Poller};
pub use tokenizer::{tokenize, Token, TokenKind};
