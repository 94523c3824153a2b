//! The remote operations a [`MailboxSession`](crate::MailboxSession) depends on.

use crate::{Client, MailAddress, MessageContent, MessageSummary, Result};
use async_trait::async_trait;

/// A disposable mail provider.
///
/// [`Client`] is the HTTP implementation; anything else is a stand-in.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// Obtain one fresh random address.
    async fn generate_mailbox(&self) -> Result<MailAddress>;

    /// List the inbox of `address` in provider order.
    async fn list_messages(&self, address: &MailAddress) -> Result<Vec<MessageSummary>>;

    /// Read message `id` of `address`.
    async fn read_message(&self, address: &MailAddress, id: u64) -> Result<MessageContent>;
}

#[async_trait]
impl MailApi for Client {
    async fn generate_mailbox(&self) -> Result<MailAddress> {
        self.create_mailbox().await
    }

    async fn list_messages(&self, address: &MailAddress) -> Result<Vec<MessageSummary>> {
        self.get_messages(address).await
    }

    async fn read_message(&self, address: &MailAddress, id: u64) -> Result<MessageContent> {
        Client::read_message(self, address, id).await
    }
}
