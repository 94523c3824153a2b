//! 1secmail async client implementation.

use crate::{Error, MailAddress, MessageContent, MessageSummary, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;

/// Async client for the 1secmail temporary email service.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like proxies, TLS behavior, and request headers.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    headers: HeaderMap,
    proxy: Option<String>,
    base_url: String,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new 1secmail client with default settings.
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::Client;
    /// # fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Get the proxy URL if one was configured.
    ///
    /// Returns `None` when no proxy was set on the builder.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Get the API endpoint requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate one random mailbox.
    ///
    /// # Returns
    /// The address assigned by 1secmail
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// let address = client.create_mailbox().await?;
    /// println!("{address}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_mailbox(&self) -> Result<MailAddress> {
        let addresses: Vec<MailAddress> = self
            .get_api(&[("action", "genRandomMailbox"), ("count", "1")])
            .await?;

        addresses.into_iter().next().ok_or(Error::EmptyResponse)
    }

    /// List the domains the provider currently hands out addresses on.
    pub async fn domains(&self) -> Result<Vec<String>> {
        self.get_api(&[("action", "getDomainList")]).await
    }

    /// Get messages for a mailbox.
    ///
    /// # Arguments
    /// * `address` - The mailbox to list
    ///
    /// # Returns
    /// The inbox in provider order, possibly empty
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// let address = client.create_mailbox().await?;
    /// for msg in client.get_messages(&address).await? {
    ///     println!("{}: {}", msg.from, msg.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_messages(&self, address: &MailAddress) -> Result<Vec<MessageSummary>> {
        self.get_api(&[
            ("action", "getMessages"),
            ("login", address.login()),
            ("domain", address.domain()),
        ])
        .await
    }

    /// Fetch the full content of a specific message.
    ///
    /// # Arguments
    /// * `address` - The mailbox the message belongs to
    /// * `id` - The message ID from [`Client::get_messages`]
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::new()?;
    /// let address = client.create_mailbox().await?;
    /// let messages = client.get_messages(&address).await?;
    /// if let Some(msg) = messages.first() {
    ///     let content = client.read_message(&address, msg.id).await?;
    ///     println!("{}", content.body);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_message(&self, address: &MailAddress, id: u64) -> Result<MessageContent> {
        let id = id.to_string();
        self.get_api(&[
            ("action", "readMessage"),
            ("login", address.login()),
            ("domain", address.domain()),
            ("id", id.as_str()),
        ])
        .await
    }

    /// Download an attachment listed in [`MessageContent::attachments`].
    pub async fn download_attachment(
        &self,
        address: &MailAddress,
        id: u64,
        filename: &str,
    ) -> Result<Vec<u8>> {
        let id = id.to_string();
        let response = self
            .send(&[
                ("action", "download"),
                ("login", address.login()),
                ("domain", address.domain()),
                ("id", id.as_str()),
                ("file", filename),
            ])
            .await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Common GET API request pattern for JSON endpoints.
    async fn get_api<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let body = self.send(params).await?.text().await?;
        serde_json::from_str(&body).map_err(Into::into)
    }

    /// Send a GET and split non-2xx responses off as [`Error::Provider`].
    async fn send(&self, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        tracing::debug!(?params, url = %self.base_url, "GET");

        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            tracing::debug!(%status, ?headers, "provider rejected request");
            let body = response.text().await?;
            return Err(Error::Provider {
                status,
                body,
                headers,
            });
        }

        Ok(response)
    }
}

const API_URL: &str = "https://www.1secmail.com/api/v1/";
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const REFERER_VALUE: &str = "https://www.1secmail.com/";

/// Builder for configuring a 1secmail client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    accept: String,
    referer: String,
    base_url: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - Desktop browser user agent, JSON accept header, 1secmail referer
    /// - Default 1secmail API endpoint
    pub fn new() -> Self {
        Self {
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            accept: ACCEPT_VALUE.to_string(),
            referer: REFERER_VALUE.to_string(),
            base_url: API_URL.to_string(),
        }
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:9050").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the `Accept` header.
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Override the `Referer` header.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Override the API endpoint URL.
    ///
    /// Useful for testing against a local stub.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the client.
    ///
    /// No request is made; this fails only on an unusable proxy URL, a header
    /// value that is not valid HTTP, or a TLS backend that cannot start.
    ///
    /// # Examples
    /// ```no_run
    /// # use onesecmail_client::Client;
    /// # fn main() -> Result<(), onesecmail_client::Error> {
    /// let client = Client::builder()
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(self.danger_accept_invalid_certs);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let http = builder.build()?;

        let mut headers = HeaderMap::new();
        for (name, value) in [
            (USER_AGENT, &self.user_agent),
            (ACCEPT, &self.accept),
            (REFERER, &self.referer),
        ] {
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        Ok(Client {
            http,
            headers,
            proxy: self.proxy,
            base_url: self.base_url,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_target_1secmail() {
        let client = Client::new().unwrap();
        assert_eq!(client.base_url(), "https://www.1secmail.com/api/v1/");
        assert_eq!(client.proxy(), None);
        assert_eq!(client.headers[REFERER], "https://www.1secmail.com/");
        assert_eq!(client.headers[ACCEPT], "application/json, text/plain, */*");
    }

    #[test]
    fn builder_overrides_headers_and_proxy() {
        let client = Client::builder()
            .user_agent("tests/1.0")
            .proxy("socks5://127.0.0.1:9050")
            .build()
            .unwrap();
        assert_eq!(client.headers[USER_AGENT], "tests/1.0");
        assert_eq!(client.proxy(), Some("socks5://127.0.0.1:9050"));
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let err = Client::builder().referer("bad\nvalue").build().unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(name) if name == "referer"));
    }
}
