//! Client library and command line tool for Bing's homepage image archive.
//!
//! [`bing`] holds the feed client: query construction, the feed fetcher and
//! parser, lazily fetched archive segments and the image downloader.

pub mod bing;
pub mod cli;
pub mod settings;
