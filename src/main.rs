//! `onesecmail` - get a disposable address, wait for one email, print it.

use onesecmail_client::workflow::{self, EXIT_UNEXPECTED};
use onesecmail_client::{Client, MailboxSession, PollPolicy};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onesecmail=info,onesecmail_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let client = match Client::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("An unexpected error occurred:\n{e}");
            return ExitCode::from(EXIT_UNEXPECTED);
        }
    };

    let session = MailboxSession::new(client);
    let policy = PollPolicy::default();

    match workflow::run(&session, &policy, &mut io::stdout()).await {
        Ok(completion) => ExitCode::from(completion.exit_code()),
        Err(e) => {
            // Nothing left to report to if stderr itself is gone.
            let _ = workflow::report(&e, &mut io::stderr());
            ExitCode::from(e.exit_code())
        }
    }
}
