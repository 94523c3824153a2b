//! The create → poll → read run driven by the `onesecmail` binary.

use crate::{
    Error, MailApi, MailboxSession, MessageContent, PollOutcome, PollPolicy, WorkflowError,
};
use std::error::Error as _;
use std::io::{self, Write};
use std::time::Duration;

/// Process exit code when a message was read and displayed.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit code for failures outside the three remote steps.
pub const EXIT_UNEXPECTED: u8 = 1;
/// Process exit code when no mailbox could be created.
pub const EXIT_CREATE_FAILED: u8 = 2;
/// Process exit code when no message arrived before the poll deadline.
pub const EXIT_TIMED_OUT: u8 = 3;
/// Process exit code when the received message could not be read.
pub const EXIT_FETCH_FAILED: u8 = 4;

/// How a run ended when no step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A message arrived and was displayed.
    Delivered(MessageContent),
    /// Nothing arrived before the poll deadline; nothing was read.
    TimedOut {
        /// Poll timeout that elapsed.
        waited: Duration,
    },
}

impl Completion {
    /// Process exit code for this completion.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Delivered(_) => EXIT_SUCCESS,
            Self::TimedOut { .. } => EXIT_TIMED_OUT,
        }
    }
}

impl WorkflowError {
    /// Process exit code for the step that failed.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::CreateMailbox(_) => EXIT_CREATE_FAILED,
            Self::FetchMessage { .. } => EXIT_FETCH_FAILED,
            Self::Output(_) => EXIT_UNEXPECTED,
        }
    }
}

/// Runs one full session, writing status lines and the message to `out`.
///
/// Returns as soon as a one-shot step fails. A poll timeout is a normal
/// completion and is reported on `out`.
pub async fn run<A, W>(
    session: &MailboxSession<A>,
    policy: &PollPolicy,
    out: &mut W,
) -> Result<Completion, WorkflowError>
where
    A: MailApi,
    W: Write + Send,
{
    writeln!(out, "Getting a temporary email address...")?;
    let address = session
        .create_mailbox()
        .await
        .map_err(WorkflowError::CreateMailbox)?;
    writeln!(out, "-> Your temporary email is: {address}")?;

    writeln!(
        out,
        "\nWaiting for an email to arrive. This will time out after {} seconds.",
        policy.timeout.as_secs()
    )?;
    writeln!(out, "You can send an email to the address above to test it.")?;
    out.flush()?;

    let summary = match session.poll_for_message(&address, policy).await {
        PollOutcome::Received(summary) => summary,
        PollOutcome::TimedOut { attempts, elapsed } => {
            tracing::debug!(attempts, ?elapsed, "poll deadline reached");
            writeln!(
                out,
                "Timeout: No email received within {} seconds.",
                policy.timeout.as_secs()
            )?;
            out.flush()?;
            return Ok(Completion::TimedOut {
                waited: policy.timeout,
            });
        }
    };
    writeln!(out, "New email received!")?;

    writeln!(out, "Reading email content...")?;
    let content = session
        .fetch_message(&address, summary.id)
        .await
        .map_err(|source| WorkflowError::FetchMessage {
            id: summary.id,
            source,
        })?;

    writeln!(out, "\n--- Email Content ---")?;
    writeln!(out, "{content}")?;
    writeln!(out, "---------------------")?;
    out.flush()?;

    Ok(Completion::Delivered(content))
}

/// Writes a failed run to `err`: the error, the parts of its source chain not
/// already in its message, and the provider's response headers when mailbox
/// creation was refused.
pub fn report<W: Write>(error: &WorkflowError, err: &mut W) -> io::Result<()> {
    let mut shown = error.to_string();
    writeln!(err, "{shown}")?;

    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !shown.contains(&text) {
            writeln!(err, "  caused by: {text}")?;
            shown = text;
        }
        source = cause.source();
    }

    if let WorkflowError::CreateMailbox(Error::Provider { headers, .. }) = error
        && !headers.is_empty()
    {
        writeln!(err, "Headers: {headers:?}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageSummary;
    use crate::api::stub::ScriptedApi;
    use reqwest::StatusCode;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn hi_summary() -> MessageSummary {
        MessageSummary {
            id: 42,
            from: "a@b.com".to_string(),
            subject: "Hi".to_string(),
            date: "2024-01-01 10:00:00".to_string(),
        }
    }

    fn hi_content() -> MessageContent {
        serde_json::from_str(r#"{"from":"a@b.com","subject":"Hi","body":"Hello world"}"#).unwrap()
    }

    fn fast() -> PollPolicy {
        PollPolicy::new(Duration::from_millis(1), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn delivers_after_one_empty_listing() {
        let api = ScriptedApi::new("test1@example.com")
            .listing(Ok(vec![]))
            .listing(Ok(vec![hi_summary()]))
            .content(Ok(hi_content()));
        let session = MailboxSession::new(api);
        let mut out = Vec::new();

        let completion = run(&session, &fast(), &mut out).await.unwrap();

        assert_eq!(completion, Completion::Delivered(hi_content()));
        assert_eq!(completion.exit_code(), 0);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("-> Your temporary email is: test1@example.com"));
        assert!(out.contains("From: a@b.com\nSubject: Hi\nBody: Hello world\n"));
        assert_eq!(session.api().list_calls(), 2);
        assert_eq!(session.api().read_calls(), 1);
    }

    #[tokio::test]
    async fn create_failure_stops_before_polling() {
        let api = ScriptedApi::new("test1@example.com")
            .failing_mailbox(Error::provider(StatusCode::FORBIDDEN, "Forbidden"));
        let session = MailboxSession::new(api);
        let mut out = Vec::new();

        let err = run(&session, &fast(), &mut out).await.unwrap_err();

        assert!(matches!(err, WorkflowError::CreateMailbox(_)));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(session.api().list_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_skips_fetch_and_says_so() {
        let session = MailboxSession::new(ScriptedApi::new("test1@example.com"));
        let mut out = Vec::new();

        let completion = run(&session, &PollPolicy::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(
            completion,
            Completion::TimedOut {
                waited: Duration::from_secs(120)
            }
        );
        assert_eq!(completion.exit_code(), 3);
        assert_eq!(session.api().read_calls(), 0);
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("Timeout: No email received within 120 seconds.\n"));
        assert!(!out.contains("New email received!"));
    }

    #[tokio::test]
    async fn fetch_failure_does_not_display_content() {
        let api = ScriptedApi::new("test1@example.com")
            .listing(Ok(vec![hi_summary()]))
            .content(Err(Error::provider(
                StatusCode::NOT_FOUND,
                "Message not found",
            )));
        let session = MailboxSession::new(api);
        let mut out = Vec::new();

        let err = run(&session, &fast(), &mut out).await.unwrap_err();

        assert!(matches!(err, WorkflowError::FetchMessage { id: 42, .. }));
        assert_eq!(err.exit_code(), 4);
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("--- Email Content ---"));
        assert!(!out.contains("From:"));
    }

    #[test]
    fn output_failure_is_unexpected() {
        let err = WorkflowError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn report_skips_causes_already_in_the_message() {
        let err = WorkflowError::FetchMessage {
            id: 42,
            source: Error::provider(StatusCode::NOT_FOUND, "Message not found"),
        };
        let mut out = Vec::new();

        report(&err, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error reading email content for message 42: \
             provider returned 404 Not Found: Message not found\n"
        );
    }

    #[test]
    fn report_prints_cause_chain_and_creation_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-ray", HeaderValue::from_static("8a1b2c3d"));
        let err = WorkflowError::CreateMailbox(Error::Provider {
            status: StatusCode::FORBIDDEN,
            body: "Forbidden".to_string(),
            headers,
        });
        let mut out = Vec::new();

        report(&err, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(
            "error getting temporary email address: provider returned 403 Forbidden: Forbidden\n"
        ));
        assert!(out.contains("Headers: {\"cf-ray\": \"8a1b2c3d\"}"));
        assert!(!out.contains("caused by"));
    }

    #[test]
    fn report_lists_causes_hidden_by_the_message() {
        let err = WorkflowError::Output(io::Error::other(Hidden));
        let mut out = Vec::new();

        report(&err, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("caused by: root cause: disk full"));
    }

    #[derive(Debug)]
    struct Hidden;

    impl std::fmt::Display for Hidden {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("wrapped")
        }
    }

    impl std::error::Error for Hidden {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&Root)
        }
    }

    #[derive(Debug)]
    struct Root;

    impl std::fmt::Display for Root {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("root cause: disk full")
        }
    }

    impl std::error::Error for Root {}
}
