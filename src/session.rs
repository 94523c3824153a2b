//! Mailbox session: create, poll until a message lands, read it.

use crate::{Client, MailAddress, MailApi, MessageContent, MessageSummary, Result};
use std::time::Duration;
use tokio::time::Instant;

/// How long and how often to poll an inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two listing requests.
    pub interval: Duration,
    /// Total time, measured from the start of polling, after which no new
    /// listing request is issued.
    pub timeout: Duration,
}

impl PollPolicy {
    /// Creates a policy with the given interval and timeout.
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollPolicy {
    /// Every 5 seconds for 2 minutes.
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(120))
    }
}

/// Result of polling an inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The first entry of the first non-empty listing.
    Received(MessageSummary),
    /// The deadline passed with every listing empty or failed.
    TimedOut {
        /// Listing requests issued.
        attempts: u32,
        /// Time spent polling.
        elapsed: Duration,
    },
}

/// One disposable mailbox workflow against a provider.
///
/// Every call is sequential; the session never has two requests in flight.
#[derive(Debug)]
pub struct MailboxSession<A = Client> {
    api: A,
}

impl<A: MailApi> MailboxSession<A> {
    /// Creates a session over a configured provider.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Returns the underlying provider.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Obtains one random address. One-shot: failures are returned as is.
    pub async fn create_mailbox(&self) -> Result<MailAddress> {
        let address = self.api.generate_mailbox().await?;
        tracing::debug!(%address, "mailbox created");
        Ok(address)
    }

    /// Lists `address` until a message appears or `policy.timeout` elapses.
    ///
    /// A failed listing is logged and retried after `policy.interval` like an
    /// empty one. The deadline is checked only between requests, so an
    /// in-flight request always completes.
    pub async fn poll_for_message(&self, address: &MailAddress, policy: &PollPolicy) -> PollOutcome {
        let start = Instant::now();
        let deadline = start + policy.timeout;
        let mut attempts = 0;

        while Instant::now() < deadline {
            attempts += 1;

            match self.api.list_messages(address).await {
                Ok(messages) => {
                    if let Some(first) = messages.into_iter().next() {
                        tracing::debug!(attempts, id = first.id, "message received");
                        return PollOutcome::Received(first);
                    }
                    tracing::info!(
                        attempt = attempts,
                        "No email received yet. Waiting {:?}...",
                        policy.interval
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempts,
                        "Error checking for new emails (will keep trying): {e}"
                    );
                }
            }

            tokio::time::sleep(policy.interval).await;
        }

        PollOutcome::TimedOut {
            attempts,
            elapsed: start.elapsed(),
        }
    }

    /// Reads the full message. One-shot: failures are returned as is.
    pub async fn fetch_message(&self, address: &MailAddress, id: u64) -> Result<MessageContent> {
        self.api.read_message(address, id).await
    }
}
