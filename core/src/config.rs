//! Poll loop configuration.

use std::time::Duration;

/// Externally supplied knobs for the poll loop.
///
/// Delays are fixed by design: no exponent, no jitter, no cap beyond
/// retrying indefinitely. Tests zero them out.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// Redirect bound handed to the transport.
    pub max_redirects: u32,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Hard bound on the tokenizer's output for one response body.
    pub token_capacity: usize,
    /// Wait after a failed attempt before the retry.
    pub retry_delay: Duration,
    /// Settling wait after tearing a connection down, before the next one.
    pub settle_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            max_redirects: 3,
            user_agent: concat!("updates-core/", env!("CARGO_PKG_VERSION")).to_string(),
            token_capacity: 256,
            retry_delay: Duration::from_secs(2),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl PollConfig {
    /// A config with both delays zeroed, for tests that drive the loop
    /// synchronously.
    pub fn without_delays() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
