mod archive;
mod downloader;
mod feed;
mod http;
mod image;
mod parser;
mod query;
mod types;
mod writer;


pub use archive::{ArchiveSegment, BingHomepageImages, ImageArchive, SEGMENTS};
pub use downloader::{DEFAULT_FILENAME, DownloadOutcome, Downloader, destination_filename};
pub use feed::{
    FEED_ENDPOINT, FeedFormat, FeedQuery, FeedResponse, HpImageArchive, MAX_COUNT, MAX_INDEX,
};
pub use http::{CHUNK_SIZE, HttpClient};
pub use image::Image;
pub use parser::{parse_date, parse_datetime, parse_feed};
pub use query::{build_url, split_query};
pub use types::FeedEntry;
pub use writer::Writer;

/// Default host for both the feed and the image binaries
pub const BING_BASE_URL: &str = "https://www.bing.com";

/// Default market (locale) for the feed
pub const DEFAULT_MARKET: &str = "en-US";

/// Bing result type
pub type Result<T> = std::result::Result<T, BingError>;

/// Bing error types
#[derive(Debug, thiserror::Error)]
pub enum BingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BingError {
    /// HTTP status carried by the error, if any
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
