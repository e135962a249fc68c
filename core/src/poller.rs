//! The poll loop: request, reassemble, extract, advance, repeat.
//!
//! # Design
//! One cycle is `poll_once`: build the URL from the cursor, open a fresh
//! connection, drain its events through the assembler, run the tokenizer
//! and extraction synchronously once the body completes, and advance the
//! cursor on success. The connection handle never outlives the attempt.
//!
//! `run` drives cycles forever. Every recoverable failure is logged with
//! its specific kind and scheduled for retry after a fixed delay; a missed
//! extraction leaves the cursor alone but still re-polls — the policy is
//! never getting stuck, not never missing an update. Only a transport
//! handle that cannot be created at all ends the loop, for the supervising
//! layer to restart.

use std::thread;

use crate::assembler::ResponseAssembler;
use crate::client::UpdatesClient;
use crate::config::PollConfig;
use crate::cursor::PollCursor;
use crate::error::PollError;
use crate::http::{Connection, HttpEvent, PollRequest, Transport};

/// What a successful poll attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A new update was seen; the cursor now holds its id.
    Advanced(u64),
    /// The response was well formed but held nothing new.
    NoNewUpdates,
}

/// Drives the request/assemble/extract/advance cycle over a [`Transport`].
#[derive(Debug)]
pub struct Poller<T: Transport> {
    client: UpdatesClient,
    transport: T,
    config: PollConfig,
    cursor: PollCursor,
}

impl<T: Transport> Poller<T> {
    pub fn new(client: UpdatesClient, transport: T, config: PollConfig) -> Self {
        Self {
            client,
            transport,
            config,
            cursor: PollCursor::new(),
        }
    }

    /// The last update id confirmed by an extraction.
    pub fn cursor(&self) -> u64 {
        self.cursor.current()
    }

    /// Run one full poll attempt.
    ///
    /// The cursor advances only if the whole pipeline — transport,
    /// reassembly, tokenization, extraction, numeric parse — succeeds.
    pub fn poll_once(&mut self) -> Result<PollOutcome, PollError> {
        let request = PollRequest {
            url: self.client.get_updates_url(self.cursor.next_request_offset()),
            timeout: self.config.timeout,
            max_redirects: self.config.max_redirects,
            user_agent: self.config.user_agent.clone(),
        };

        let mut conn = self.transport.connect(&request)?;
        let mut assembler = ResponseAssembler::new();

        let body = loop {
            match conn.next_event() {
                HttpEvent::Connected => {
                    log::debug!("connected to {}", request.url);
                    assembler.on_connect();
                }
                HttpEvent::HeadersSent => {}
                HttpEvent::HeaderReceived { name, value } => assembler.on_header(&name, &value),
                HttpEvent::DataChunk(chunk) => assembler.on_data(&chunk)?,
                HttpEvent::Finished => break assembler.on_finish()?,
                HttpEvent::Disconnected => {
                    assembler.on_disconnect();
                    return Err(PollError::Transport(
                        "disconnected before the response completed".to_string(),
                    ));
                }
                HttpEvent::Error(message) => {
                    assembler.on_error();
                    return Err(PollError::Transport(message));
                }
            }
        };
        // Teardown before extraction: the handle must not survive the
        // attempt, and the body buffer is self-contained from here on.
        drop(conn);

        log::debug!("response body: {}", String::from_utf8_lossy(&body));
        match self
            .client
            .parse_get_updates(&body, self.config.token_capacity)?
        {
            Some(update_id) => {
                self.cursor.advance(update_id);
                Ok(PollOutcome::Advanced(update_id))
            }
            None => Ok(PollOutcome::NoNewUpdates),
        }
    }

    /// Poll forever.
    ///
    /// Returns only on the fatal path — a transport handle that could not
    /// be created. The caller decides what a restart means.
    pub fn run(&mut self) -> Result<(), PollError> {
        loop {
            match self.poll_once() {
                Ok(PollOutcome::Advanced(update_id)) => {
                    log::info!("cursor advanced to {update_id}");
                }
                Ok(PollOutcome::NoNewUpdates) => {
                    log::debug!("no new updates");
                }
                Err(err) if err.is_fatal() => {
                    log::error!("{err}");
                    return Err(err);
                }
                Err(err) => {
                    log::warn!("poll attempt failed, will retry: {err}");
                    thread::sleep(self.config.retry_delay);
                }
            }
            // Settling delay between teardown and the next connection.
            thread::sleep(self.config.settle_delay);
        }
    }
}
