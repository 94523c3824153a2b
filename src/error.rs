//! Error types for 1secmail operations.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// Errors returned by a single request against the 1secmail API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response was received (connection, TLS, proxy or body read failure).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("provider returned {status}: {body}")]
    Provider {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body, possibly empty.
        body: String,
        /// Response headers.
        headers: HeaderMap,
    },

    /// A 2xx body that does not match the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),

    /// A string that is not a `local@domain` address.
    #[error("invalid mail address: {0:?}")]
    InvalidAddress(String),

    /// The generate call succeeded but returned no address.
    #[error("provider returned no mailbox")]
    EmptyResponse,

    /// A configured header value is not valid HTTP.
    #[error("invalid value for header {0}")]
    InvalidHeader(String),
}

impl Error {
    /// Creates a provider error without response headers.
    pub fn provider(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Returns the HTTP status for provider failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// A workflow step that aborted.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The mailbox could not be created; nothing else ran.
    #[error("error getting temporary email address: {0}")]
    CreateMailbox(#[source] Error),

    /// A message arrived but its content could not be read.
    #[error("error reading email content for message {id}: {source}")]
    FetchMessage {
        /// Id of the message that was being read.
        id: u64,
        /// Underlying request failure.
        #[source]
        source: Error,
    },

    /// Status output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_reports_status_and_body() {
        let err = Error::provider(StatusCode::FORBIDDEN, "blocked");
        assert_eq!(err.to_string(), "provider returned 403 Forbidden: blocked");
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn fetch_failure_names_the_message() {
        let err = WorkflowError::FetchMessage {
            id: 42,
            source: Error::EmptyResponse,
        };
        assert!(err.to_string().contains("message 42"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
