use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// One image listed by the feed
///
/// `url` is the relative path and query of the image binary on the feed host,
/// never a host-qualified URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedEntry {
    pub startdate: Option<NaiveDate>,
    pub fullstartdate: Option<NaiveDateTime>,
    pub enddate: Option<NaiveDate>,
    pub url: String,
    pub urlbase: Option<String>,
    pub copyright: Option<String>,
    pub copyrightlink: Option<String>,
    pub title: String,
    pub quiz: Option<String>,
    pub wp: Option<bool>,
    pub hsh: Option<String>,
    pub drk: Option<Value>,
    pub top: Option<Value>,
    pub bot: Option<Value>,
    pub hs: Option<Vec<Value>>,
    /// JSON object this entry was decoded from
    pub raw: Value,
}

impl FeedEntry {
    /// Create an entry with only the fields a listing needs
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_startdate(mut self, startdate: Option<NaiveDate>) -> Self {
        self.startdate = startdate;
        self
    }

    /// Listing line: `YYYY-MM-DD | title`
    #[must_use]
    pub fn listing_line(&self) -> String {
        let date = self
            .startdate
            .map_or_else(|| "----------".to_string(), |d| d.format("%Y-%m-%d").to_string());

        format!("{date} | {}", self.title)
    }
}

#[cfg(test)]
mod test {
    use super::FeedEntry;
    use chrono::NaiveDate;

    #[test]
    fn test_listing_line() {
        let entry = FeedEntry::new("/th?id=a.jpg", "Autumn in the Alps")
            .with_startdate(NaiveDate::from_ymd_opt(2024, 10, 3));

        assert_eq!(entry.listing_line(), "2024-10-03 | Autumn in the Alps");
    }

    #[test]
    fn test_listing_line_without_date() {
        let entry = FeedEntry::new("/th?id=a.jpg", "Undated");

        assert_eq!(entry.listing_line(), "---------- | Undated");
    }
}
