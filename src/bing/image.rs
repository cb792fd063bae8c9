use crate::bing::{Result, http::HttpClient, types::FeedEntry};
use std::ops::Deref;
use tokio::io::AsyncWrite;
use tracing::debug;

/// A feed entry bound to the client that can fetch its bytes
#[derive(Debug, Clone)]
pub struct Image {
    entry: FeedEntry,
    client: HttpClient,
}

impl Image {
    pub fn new(entry: FeedEntry, client: HttpClient) -> Self {
        Self { entry, client }
    }

    #[must_use]
    pub const fn entry(&self) -> &FeedEntry {
        &self.entry
    }

    #[must_use]
    pub fn into_entry(self) -> FeedEntry {
        self.entry
    }

    /// Stream the image into `sink`.
    ///
    /// The entry's relative `url` is resolved against the client's base URL and
    /// its query string is re-sent as request parameters. Fails with
    /// [`BingError::Http`](crate::bing::BingError::Http) before writing anything
    /// when the status is not a success.
    pub async fn save<W>(&self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let response = self.client.get_split(&self.entry.url).await?;
        let response = HttpClient::ensure_success(response)?;

        let written = HttpClient::stream_to(response, sink).await?;
        debug!("Saved {written} bytes of {}", self.entry.url);

        Ok(written)
    }
}

impl Deref for Image {
    type Target = FeedEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}
