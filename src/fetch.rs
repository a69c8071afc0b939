//! HTTP access for the providers.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum Error {
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("server answered with HTTP status {0}")]
  Status(u16),
}

/// Anything that can GET a URL and hand back the body as text.
pub trait Fetch {
  fn fetch(&self, url: &str) -> impl Future<Output = Result<String, Error>> + Send;
}

/// [`Fetch`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  /// Builds the client with the given user agent and per-request timeout.
  ///
  /// # Errors
  /// Returns an error if the TLS backend cannot be initialised.
  pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, Error> {
    let client = Client::builder()
      .user_agent(user_agent)
      .timeout(timeout)
      .build()?;
    Ok(Self { client })
  }
}

impl Fetch for HttpFetcher {
  async fn fetch(&self, url: &str) -> Result<String, Error> {
    debug!(%url, "GET");
    let response = self.client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Status(status.as_u16()));
    }

    let body = response.text().await?;
    debug!(%url, bytes = body.len(), "response received");
    Ok(body)
  }
}
