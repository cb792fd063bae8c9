use crate::bing::{BingError, Result, query};
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Block size used when copying a response body into a sink
pub const CHUNK_SIZE: usize = 4096;

const DEFAULT_USER_AGENT: &str = concat!("bing-images/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client handle shared by every request of a run
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client with the default user agent and timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP client with an explicit user agent and timeout.
    ///
    /// `timeout` bounds connecting and each read, not the whole exchange, so a
    /// slow body keeps streaming as long as bytes keep arriving.
    pub fn with_options(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        Ok(Self::from_client(client, base_url))
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub const fn inner(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL from endpoint and parameters
    pub fn url<K, V>(&self, endpoint: &str, params: &[(K, V)]) -> Result<Url>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        query::build_url(&self.base_url, endpoint, params)
    }

    /// Execute GET request with query parameters. The status is not checked.
    pub async fn get<K, V>(&self, endpoint: &str, params: &[(K, V)]) -> Result<Response>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.url(endpoint, params)?;
        debug!("GET {url}");

        Ok(self.client.get(url).send().await?)
    }

    /// Execute GET request for an endpoint whose query string is split off and
    /// re-sent as request parameters. The status is not checked.
    pub async fn get_split(&self, endpoint: &str) -> Result<Response> {
        let url = self.url::<&str, &str>(endpoint, &[])?;
        let (bare, params) = query::split_query(&url);
        debug!("GET {bare} with {} query parameter(s)", params.len());

        Ok(self.client.get(bare).query(&params).send().await?)
    }

    /// Fail with [`BingError::Http`] unless the response status is a success
    pub fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();

        if !status.is_success() {
            return Err(BingError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response)
    }

    /// Stream a response body into `sink` in blocks of at most [`CHUNK_SIZE`] bytes
    pub async fn stream_to<W>(mut response: Response, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await? {
            for block in chunk.chunks(CHUNK_SIZE) {
                sink.write_all(block).await?;
                written += block.len() as u64;
            }
        }
        sink.flush().await?;

        Ok(written)
    }
}
