use serde::Deserialize;
use serde_json::Value;

// Feed document
#[derive(Debug, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub images: Vec<Value>,
}

// One element of `images`. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImageRecord {
    pub startdate: Option<String>,
    pub fullstartdate: Option<String>,
    // Older spelling of `fullstartdate`
    pub startfulldate: Option<String>,
    pub enddate: Option<String>,
    pub url: Option<String>,
    pub urlbase: Option<String>,
    pub copyright: Option<String>,
    pub copyrightlink: Option<String>,
    pub title: Option<String>,
    pub quiz: Option<String>,
    pub wp: Option<bool>,
    pub hsh: Option<String>,
    // Older spelling of `hsh`
    pub image: Option<String>,
    pub drk: Option<Value>,
    pub top: Option<Value>,
    pub bot: Option<Value>,
    pub hs: Option<Vec<Value>>,
}
