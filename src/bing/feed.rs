use crate::bing::{
    BingError, DEFAULT_MARKET, Result,
    http::HttpClient,
    parser,
    types::FeedEntry,
};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWrite;
use tracing::{debug, info};

/// Feed endpoint on the Bing host
pub const FEED_ENDPOINT: &str = "/HPImageArchive.aspx";

/// Largest number of images a single feed request may ask for
pub const MAX_COUNT: u8 = 8;

/// Oldest day index the feed serves (0 is today)
pub const MAX_INDEX: u8 = 14;

/// Content type requested from the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// JSON
    #[default]
    Js,
    Xml,
    Rss,
}

impl FeedFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Xml => "xml",
            Self::Rss => "rss",
        }
    }
}

impl std::fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one feed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Number of images, 1 to 8
    pub count: u8,
    /// Days ago of the first image, 0 to 14
    pub index: u8,
    /// Market override; the archive's market is used when unset
    pub market: Option<String>,
    pub format: FeedFormat,
}

impl FeedQuery {
    pub fn new(count: u8) -> Self {
        Self {
            count,
            index: 0,
            market: None,
            format: FeedFormat::default(),
        }
    }

    pub fn with_index(mut self, index: u8) -> Self {
        self.index = index;
        self
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn with_format(mut self, format: FeedFormat) -> Self {
        self.format = format;
        self
    }

    /// Check the window against the feed's limits
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_COUNT).contains(&self.count) {
            return Err(BingError::InvalidArgument(format!(
                "count must be between 1 and {MAX_COUNT}, got {}",
                self.count
            )));
        }
        if self.index > MAX_INDEX {
            return Err(BingError::InvalidArgument(format!(
                "index must be between 0 and {MAX_INDEX}, got {}",
                self.index
            )));
        }
        Ok(())
    }

    /// Query parameters in request order
    #[must_use]
    pub fn params(&self, default_market: &str) -> Vec<(&'static str, String)> {
        vec![
            ("format", self.format.to_string()),
            ("mkt", self.market.as_deref().unwrap_or(default_market).to_string()),
            ("n", self.count.to_string()),
            ("idx", self.index.to_string()),
        ]
    }
}

/// Status, headers and body of one HTTP response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedResponse {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content: Option<Vec<u8>>,
    pub encoding: Option<String>,
}

impl FeedResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }

    /// Fail with [`BingError::Http`] on a non-success status
    pub fn error_for_status(self, url: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BingError::Http {
                status: self.status_code,
                url: url.to_string(),
            })
        }
    }

    /// Parse the body as a JSON feed
    pub fn entries(&self) -> Result<Vec<FeedEntry>> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| BingError::Parse("response has no content".to_string()))?;

        parser::parse_feed(content)
    }
}

/// Connection to Bing's homepage image archive
#[derive(Debug, Clone)]
pub struct HpImageArchive {
    client: HttpClient,
    market: String,
}

impl HpImageArchive {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            market: DEFAULT_MARKET.to_string(),
        }
    }

    /// Set the market used when a query carries none
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = market.into();
        self
    }

    #[must_use]
    pub fn market(&self) -> &str {
        &self.market
    }

    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Query the feed for a listing of images.
    ///
    /// The query is validated before anything is sent. A non-success status is
    /// returned as-is; callers decide whether it is fatal.
    pub async fn get_feed(&self, query: &FeedQuery) -> Result<FeedResponse> {
        query.validate()?;

        let params = query.params(&self.market);
        let response = self.client.get(FEED_ENDPOINT, &params).await?;

        let status_code = response.status().as_u16();
        let content_type = header_string(&response);
        let encoding = content_type.as_deref().and_then(charset);
        info!(
            "Feed n={} idx={} responded {status_code}",
            query.count, query.index
        );

        let content = response.bytes().await?.to_vec();

        Ok(FeedResponse {
            status_code,
            content_type,
            content: Some(content),
            encoding,
        })
    }

    /// Fetch an image from `endpoint` into `sink`.
    ///
    /// The body is written only on a success status. The returned response never
    /// carries content or encoding.
    pub async fn get_image<W>(&self, endpoint: &str, sink: &mut W) -> Result<FeedResponse>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let response = self.client.get_split(endpoint).await?;

        let status_code = response.status().as_u16();
        let content_type = header_string(&response);

        if response.status().is_success() {
            let written = HttpClient::stream_to(response, sink).await?;
            debug!("Wrote {written} bytes from {endpoint}");
        }

        Ok(FeedResponse {
            status_code,
            content_type,
            content: None,
            encoding: None,
        })
    }
}

fn header_string(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `charset` parameter of a Content-Type value
fn charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

#[cfg(test)]
mod test {
    use super::{FeedFormat, FeedQuery, FeedResponse, charset};

    #[test]
    fn test_query_params() {
        let query = FeedQuery::new(3).with_index(2);

        assert_eq!(
            query.params("en-US"),
            vec![
                ("format", "js".to_string()),
                ("mkt", "en-US".to_string()),
                ("n", "3".to_string()),
                ("idx", "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_market_override() {
        let query = FeedQuery::new(1)
            .with_market("de-DE")
            .with_format(FeedFormat::Xml);
        let params = query.params("en-US");

        assert!(params.contains(&("mkt", "de-DE".to_string())));
        assert!(params.contains(&("format", "xml".to_string())));
    }

    #[test]
    fn test_query_validation() {
        for count in 1..=8 {
            for index in 0..=14 {
                assert!(FeedQuery::new(count).with_index(index).validate().is_ok());
            }
        }
        assert!(FeedQuery::new(0).validate().is_err());
        assert!(FeedQuery::new(9).validate().is_err());
        assert!(FeedQuery::new(1).with_index(15).validate().is_err());
    }

    #[test]
    fn test_charset() {
        assert_eq!(
            charset("application/json; charset=utf-8").as_deref(),
            Some("utf-8")
        );
        assert_eq!(charset("text/html;Charset=\"ISO-8859-1\"").as_deref(), Some("ISO-8859-1"));
        assert!(charset("image/jpeg").is_none());
    }

    #[test]
    fn test_response_status() {
        let ok = FeedResponse {
            status_code: 204,
            ..Default::default()
        };
        assert!(ok.is_success());

        let failed = FeedResponse {
            status_code: 500,
            ..Default::default()
        };
        let err = failed.error_for_status("https://www.bing.com/").unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_entries_without_content() {
        assert!(FeedResponse::default().entries().is_err());
    }
}
