mod api_types;
mod entry;

pub(crate) use api_types::{FeedDocument, ImageRecord};
pub use entry::FeedEntry;
