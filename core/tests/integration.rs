//! Poll cycles against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the core's poll
//! loop over real HTTP using a ureq-backed transport. The transport
//! performs the round-trip up front and replays it as lifecycle events,
//! splitting the body into small chunks so reassembly is exercised the way
//! a real socket would exercise it.

use std::collections::VecDeque;

use updates_core::{
    Connection, HttpEvent, PollConfig, PollOutcome, PollRequest, Poller, Transport,
    TransportInitError, UpdatesClient,
};

struct UreqTransport;

struct ReplayConnection {
    events: VecDeque<HttpEvent>,
}

impl Connection for ReplayConnection {
    fn next_event(&mut self) -> HttpEvent {
        self.events.pop_front().unwrap_or(HttpEvent::Disconnected)
    }
}

impl Transport for UreqTransport {
    type Conn = ReplayConnection;

    fn connect(&mut self, request: &PollRequest) -> Result<ReplayConnection, TransportInitError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(request.timeout))
            .max_redirects(request.max_redirects)
            .user_agent(request.user_agent.as_str())
            .build()
            .new_agent();

        let mut events = VecDeque::new();
        match agent.get(&request.url).call() {
            Ok(response) => {
                events.push_back(HttpEvent::Connected);
                events.push_back(HttpEvent::HeadersSent);
                let (parts, mut body) = response.into_parts();
                for (name, value) in &parts.headers {
                    events.push_back(HttpEvent::HeaderReceived {
                        name: name.as_str().to_string(),
                        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    });
                }
                let bytes = body.read_to_vec().expect("read response body");
                for chunk in bytes.chunks(16) {
                    events.push_back(HttpEvent::DataChunk(chunk.to_vec()));
                }
                events.push_back(HttpEvent::Finished);
            }
            Err(err) => events.push_back(HttpEvent::Error(err.to_string())),
        }
        Ok(ReplayConnection { events })
    }
}

/// Enqueue an update on the mock server over its push hook.
fn push_update(base: &str, text: &str) -> u64 {
    let mut response = ureq::post(&format!("{base}/updates"))
        .content_type("application/json")
        .send(format!(r#"{{"text":"{text}"}}"#).as_bytes())
        .expect("push update");
    let body = response.body_mut().read_to_string().expect("push body");
    let json: serde_json::Value = serde_json::from_str(&body).expect("push json");
    json["update_id"].as_u64().expect("update_id")
}

#[test]
fn poll_lifecycle() {
    // Step 1: start the mock server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    let base = format!("http://{addr}");
    let client = UpdatesClient::new(&base, "TESTTOKEN");
    let mut poller = Poller::new(client, UreqTransport, PollConfig::without_delays());

    // Step 2: nothing pending — the cursor stays at zero.
    assert_eq!(poller.poll_once().unwrap(), PollOutcome::NoNewUpdates);
    assert_eq!(poller.cursor(), 0);

    // Step 3: a backlog arrives; one poll advances to the newest id.
    push_update(&base, "first message");
    let second = push_update(&base, "second message");
    assert_eq!(poller.poll_once().unwrap(), PollOutcome::Advanced(second));
    assert_eq!(poller.cursor(), second);

    // Step 4: the next poll sends offset = cursor + 1, confirming both
    // updates; nothing new comes back and the cursor holds.
    assert_eq!(poller.poll_once().unwrap(), PollOutcome::NoNewUpdates);
    assert_eq!(poller.cursor(), second);

    // Step 5: polling again with an unchanged inbox is idempotent.
    assert_eq!(poller.poll_once().unwrap(), PollOutcome::NoNewUpdates);
    assert_eq!(poller.cursor(), second);

    // Step 6: a later update advances the cursor again.
    let third = push_update(&base, "third message");
    assert_eq!(poller.poll_once().unwrap(), PollOutcome::Advanced(third));
    assert_eq!(poller.cursor(), third);
}
