//! Data models for 1secmail API responses.

use crate::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^@\s]+)@([^@\s]+)$").unwrap());

/// A disposable address of the form `local@domain`.
///
/// The provider hands these out; the only thing done with one is splitting it
/// into the `login` and `domain` query parameters of later calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MailAddress {
    address: String,
    at: usize,
}

impl MailAddress {
    /// The part before `@`.
    pub fn login(&self) -> &str {
        &self.address[..self.at]
    }

    /// The part after `@`.
    pub fn domain(&self) -> &str {
        &self.address[self.at + 1..]
    }

    /// The full address.
    pub fn as_str(&self) -> &str {
        &self.address
    }
}

impl TryFrom<String> for MailAddress {
    type Error = Error;

    fn try_from(address: String) -> Result<Self, Self::Error> {
        let at = ADDRESS_RE
            .captures(&address)
            .and_then(|c| c.get(1))
            .map(|login| login.end())
            .ok_or_else(|| Error::InvalidAddress(address.clone()))?;
        Ok(Self { address, at })
    }
}

impl FromStr for MailAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<MailAddress> for String {
    fn from(address: MailAddress) -> Self {
        address.address
    }
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// An inbox entry as returned by `getMessages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Provider-assigned message id, used to read the message.
    pub id: u64,
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Receive time as formatted by the provider.
    #[serde(default)]
    pub date: String,
}

/// File attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// File name, also the `file` parameter of a download.
    pub filename: String,
    /// MIME type.
    #[serde(default)]
    pub content_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Full message as returned by `readMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    /// Provider-assigned message id; 0 when the provider omits it.
    #[serde(default)]
    pub id: u64,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Receive time as formatted by the provider.
    #[serde(default)]
    pub date: String,
    /// Body as the provider prefers to show it (HTML when present).
    pub body: String,
    /// Plain-text part.
    #[serde(default)]
    pub text_body: String,
    /// HTML part.
    #[serde(default)]
    pub html_body: String,
    /// Files attached to the message.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From: {}", self.from)?;
        writeln!(f, "Subject: {}", self.subject)?;
        write!(f, "Body: {}", self.body)?;
        for attachment in &self.attachments {
            write!(
                f,
                "\nAttachment: {} ({}, {} bytes)",
                attachment.filename, attachment.content_type, attachment.size
            )?;
        }
        Ok(())
    }
}
