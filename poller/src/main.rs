//! Long-poll bot binary: wires configuration and the ureq transport into
//! the core poll loop and runs it until a fatal transport failure. The
//! process exit is the restart signal for whatever supervises it.

mod transport;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use updates_core::{PollConfig, Poller, UpdatesClient};

use transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "update-poller", about = "Long-poll a Bot API for updates")]
struct Args {
    /// Bot credential, as issued by the API.
    #[arg(long, env = "BOT_TOKEN")]
    token: String,

    /// API base URL.
    #[arg(long, env = "BOT_API_BASE", default_value = "https://api.telegram.org")]
    api_base: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Redirect bound per request.
    #[arg(long, default_value_t = 3)]
    max_redirects: u32,

    /// Token capacity for one response body.
    #[arg(long, default_value_t = 256)]
    token_capacity: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = PollConfig {
        timeout: Duration::from_millis(args.timeout_ms),
        max_redirects: args.max_redirects,
        token_capacity: args.token_capacity,
        user_agent: concat!("update-poller/", env!("CARGO_PKG_VERSION")).to_string(),
        ..PollConfig::default()
    };
    let client = UpdatesClient::new(&args.api_base, &args.token);
    let mut poller = Poller::new(client, UreqTransport, config);

    log::info!("polling {} for updates", args.api_base);
    match poller.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("poller stopped: {err}");
            ExitCode::FAILURE
        }
    }
}
