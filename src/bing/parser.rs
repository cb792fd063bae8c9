use crate::bing::{
    BingError, Result,
    types::{FeedDocument, FeedEntry, ImageRecord},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y%m%d";
const DATETIME_FORMAT: &str = "%Y%m%d%H%M";

/// Decode a JSON feed body into one entry per element of its `images` array
pub fn parse_feed(content: &[u8]) -> Result<Vec<FeedEntry>> {
    let document: FeedDocument = serde_json::from_slice(content)
        .map_err(|e| BingError::Parse(format!("JSON parse error: {e}")))?;

    document.images.into_iter().map(entry_from_value).collect()
}

/// Parse an 8-digit `YYYYMMDD` date. Missing or blank input is `None`.
pub fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, DATE_FORMAT)
            .map(Some)
            .map_err(|e| BingError::Parse(format!("invalid date `{v}`: {e}"))),
    }
}

/// Parse a 12-digit `YYYYMMDDHHMM` datetime. Missing or blank input is `None`.
pub fn parse_datetime(value: Option<&str>) -> Result<Option<NaiveDateTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => NaiveDateTime::parse_from_str(v, DATETIME_FORMAT)
            .map(Some)
            .map_err(|e| BingError::Parse(format!("invalid datetime `{v}`: {e}"))),
    }
}

fn entry_from_value(raw: Value) -> Result<FeedEntry> {
    let record: ImageRecord = serde_json::from_value(raw.clone())
        .map_err(|e| BingError::Parse(format!("invalid feed entry: {e}")))?;

    let fullstartdate = record.fullstartdate.or(record.startfulldate);

    Ok(FeedEntry {
        startdate: parse_date(record.startdate.as_deref())?,
        fullstartdate: parse_datetime(fullstartdate.as_deref())?,
        enddate: parse_date(record.enddate.as_deref())?,
        url: record.url.unwrap_or_default(),
        urlbase: record.urlbase,
        copyright: record.copyright,
        copyrightlink: record.copyrightlink,
        title: record.title.unwrap_or_default(),
        quiz: record.quiz,
        wp: record.wp,
        hsh: record.hsh.or(record.image),
        drk: record.drk,
        top: record.top,
        bot: record.bot,
        hs: record.hs,
        raw,
    })
}
