//! ureq-backed transport.
//!
//! # Design
//! Each poll attempt gets a freshly configured agent; the connection is a
//! small state machine that replays the request's lifecycle as events. The
//! blocking `call` happens on the first `next_event`, so connect failures
//! arrive as an `Error` event rather than a handle-creation failure —
//! ordinary network trouble is retryable, only a handle that cannot be
//! built at all is fatal. The body is streamed through the reader in fixed
//! slices so the core sees the same multi-chunk arrival pattern a real
//! socket produces.

use std::collections::VecDeque;
use std::io::Read;

use updates_core::{Connection, HttpEvent, PollRequest, Transport, TransportInitError};

const READ_CHUNK: usize = 1024;

pub struct UreqTransport;

impl Transport for UreqTransport {
    type Conn = UreqConnection;

    fn connect(&mut self, request: &PollRequest) -> Result<UreqConnection, TransportInitError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(request.timeout))
            .max_redirects(request.max_redirects)
            .user_agent(request.user_agent.as_str())
            .build()
            .new_agent();
        Ok(UreqConnection {
            agent,
            url: request.url.clone(),
            stage: Stage::Connect,
            headers: VecDeque::new(),
            reader: None,
        })
    }
}

enum Stage {
    Connect,
    HeadersSent,
    Headers,
    Body,
    Done,
}

pub struct UreqConnection {
    agent: ureq::Agent,
    url: String,
    stage: Stage,
    headers: VecDeque<(String, String)>,
    reader: Option<ureq::BodyReader<'static>>,
}

impl Connection for UreqConnection {
    fn next_event(&mut self) -> HttpEvent {
        loop {
            match self.stage {
                Stage::Connect => match self.agent.get(&self.url).call() {
                    Ok(response) => {
                        let (parts, body) = response.into_parts();
                        for (name, value) in &parts.headers {
                            self.headers.push_back((
                                name.as_str().to_string(),
                                String::from_utf8_lossy(value.as_bytes()).into_owned(),
                            ));
                        }
                        self.reader = Some(body.into_reader());
                        self.stage = Stage::HeadersSent;
                        return HttpEvent::Connected;
                    }
                    Err(err) => {
                        self.stage = Stage::Done;
                        return HttpEvent::Error(err.to_string());
                    }
                },
                Stage::HeadersSent => {
                    self.stage = Stage::Headers;
                    return HttpEvent::HeadersSent;
                }
                Stage::Headers => match self.headers.pop_front() {
                    Some((name, value)) => return HttpEvent::HeaderReceived { name, value },
                    None => self.stage = Stage::Body,
                },
                Stage::Body => {
                    let Some(reader) = self.reader.as_mut() else {
                        self.stage = Stage::Done;
                        return HttpEvent::Error("response body reader missing".to_string());
                    };
                    let mut chunk = [0u8; READ_CHUNK];
                    match reader.read(&mut chunk) {
                        Ok(0) => {
                            self.stage = Stage::Done;
                            return HttpEvent::Finished;
                        }
                        Ok(n) => return HttpEvent::DataChunk(chunk[..n].to_vec()),
                        Err(err) => {
                            self.stage = Stage::Done;
                            return HttpEvent::Error(err.to_string());
                        }
                    }
                }
                Stage::Done => return HttpEvent::Disconnected,
            }
        }
    }
}
