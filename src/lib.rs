//! # 1secmail Client
//! Asynchronous wrapper around the 1secmail disposable email HTTP API: create a random inbox, poll it until a message lands, and read that message, using [`Client`], [`ClientBuilder`] and [`MailboxSession`].
//!
//! ## Audience and uses
//! For Rust developers who need a throwaway address in integration tests, demos, or automation scripts without running mail infrastructure. The `onesecmail` binary shipped with this crate runs the whole create → poll → read sequence once and prints the message.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Polling sleeps with `tokio::time`, so tests may drive it with paused time.
//!
//! ## Out of scope
//! Not a general-purpose mail client, SMTP sender, or durable mailbox. Only one mailbox is handled at a time and nothing is persisted.
//!
//! ## Errors
//! Requests that get no response surface as [`Error::Transport`]; non-2xx statuses as [`Error::Provider`] with the status and body; bodies of the wrong shape as [`Error::Json`]. A poll that runs out of time is not an error but [`PollOutcome::TimedOut`].
//!
//! ## Example
//! ```no_run
//! use onesecmail_client::{Client, MailboxSession, PollOutcome, PollPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), onesecmail_client::Error> {
//!     let session = MailboxSession::new(Client::new()?);
//!     let address = session.create_mailbox().await?;
//!     println!("Send something to {address}");
//!
//!     if let PollOutcome::Received(summary) =
//!         session.poll_for_message(&address, &PollPolicy::default()).await
//!     {
//!         let content = session.fetch_message(&address, summary.id).await?;
//!         println!("{content}");
//!     }
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod error;
mod models;
mod session;
pub mod workflow;

pub use api::MailApi;
pub use client::{Client, ClientBuilder};
pub use error::{Error, WorkflowError};
pub use models::{Attachment, MailAddress, MessageContent, MessageSummary};
pub use session::{MailboxSession, PollOutcome, PollPolicy};

/// Result type alias for 1secmail operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
