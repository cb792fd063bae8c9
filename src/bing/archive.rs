use crate::bing::{
    Result,
    feed::{FEED_ENDPOINT, FeedQuery, HpImageArchive},
    http::HttpClient,
    image::Image,
};
use futures::{
    StreamExt, future,
    stream::{self, BoxStream},
};
use tracing::debug;

/// One `(index, count)` request window into the feed's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveSegment {
    pub start_index: u8,
    pub count: u8,
}

impl ArchiveSegment {
    pub const fn new(start_index: u8, count: u8) -> Self {
        Self { start_index, count }
    }

    /// Last day index covered by this window; an empty window ends where it starts
    #[must_use]
    pub const fn end_index(&self) -> u8 {
        self.start_index + self.count.saturating_sub(1)
    }

    #[must_use]
    pub fn query(&self) -> FeedQuery {
        FeedQuery::new(self.count).with_index(self.start_index)
    }
}

/// Today alone first (the common case), then two windows that reach day 14
/// without overlapping or exceeding the per-request cap.
pub const SEGMENTS: [ArchiveSegment; 3] = [
    ArchiveSegment::new(0, 1),
    ArchiveSegment::new(1, 6),
    ArchiveSegment::new(7, 8),
];

/// Feed request for a single archive segment
#[derive(Debug, Clone)]
pub struct ImageArchive {
    archive: HpImageArchive,
    segment: ArchiveSegment,
}

impl ImageArchive {
    pub fn new(archive: HpImageArchive, segment: ArchiveSegment) -> Self {
        Self { archive, segment }
    }

    #[must_use]
    pub const fn segment(&self) -> ArchiveSegment {
        self.segment
    }

    /// Fetch and parse this segment. Every call goes back to the network.
    pub async fn fetch_images(&self) -> Result<Vec<Image>> {
        debug!(
            "Fetching archive segment idx={} n={}",
            self.segment.start_index, self.segment.count
        );

        let client = self.archive.client();
        let response = self
            .archive
            .get_feed(&self.segment.query())
            .await?
            .error_for_status(&format!("{}{FEED_ENDPOINT}", client.base_url()))?;

        Ok(response
            .entries()?
            .into_iter()
            .map(|entry| Image::new(entry, client.clone()))
            .collect())
    }
}

/// Up to fifteen days of homepage images, fetched segment by segment
#[derive(Debug, Clone)]
pub struct BingHomepageImages {
    archive: HpImageArchive,
    segments: Vec<ArchiveSegment>,
}

impl BingHomepageImages {
    pub fn new(client: HttpClient) -> Self {
        Self::from_archive(HpImageArchive::new(client))
    }

    pub fn from_archive(archive: HpImageArchive) -> Self {
        Self {
            archive,
            segments: SEGMENTS.to_vec(),
        }
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.archive = self.archive.with_market(market);
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[ArchiveSegment] {
        &self.segments
    }

    /// Lazily yield images in segment order.
    ///
    /// A segment is requested only once the consumer has drained the previous
    /// one. A failed segment yields its error in place of its images.
    pub fn get_images(&self) -> BoxStream<'static, Result<Image>> {
        let archives: Vec<ImageArchive> = self
            .segments
            .iter()
            .map(|segment| ImageArchive::new(self.archive.clone(), *segment))
            .collect();

        stream::iter(archives)
            .then(|archive| async move { archive.fetch_images().await })
            .flat_map(|result| match result {
                Ok(images) => stream::iter(images.into_iter().map(Ok)).left_stream(),
                Err(e) => stream::once(future::ready(Err(e))).right_stream(),
            })
            .boxed()
    }
}

#[cfg(test)]
mod test {
    use super::{ArchiveSegment, SEGMENTS};
    use crate::bing::feed::{MAX_COUNT, MAX_INDEX};

    #[test]
    fn test_segments_cover_history_without_overlap() {
        let mut next = 0u8;
        for segment in SEGMENTS {
            assert_eq!(segment.start_index, next);
            assert!((1..=MAX_COUNT).contains(&segment.count));
            next = segment.end_index() + 1;
        }
        assert_eq!(next, MAX_INDEX + 1);
    }

    #[test]
    fn test_segment_queries_are_valid() {
        for segment in SEGMENTS {
            let query = segment.query();
            assert!(query.validate().is_ok());
            assert_eq!(query.index, segment.start_index);
            assert_eq!(query.count, segment.count);
        }
    }

    #[test]
    fn test_end_index() {
        assert_eq!(ArchiveSegment::new(7, 8).end_index(), 14);
        assert_eq!(ArchiveSegment::new(0, 1).end_index(), 0);
        assert_eq!(ArchiveSegment::new(0, 0).end_index(), 0);
        assert_eq!(ArchiveSegment::new(3, 0).end_index(), 3);
    }
}
