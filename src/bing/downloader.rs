use crate::bing::{
    BING_BASE_URL, Result,
    feed::HpImageArchive,
    image::Image,
    query,
    types::FeedEntry,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tokio::fs::{self, File};
use tracing::{info, warn};

/// File name used when an image URL carries no `id` parameter
pub const DEFAULT_FILENAME: &str = "bing_image.jpg";

/// What happened to one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    /// The destination already existed; nothing was fetched
    Skipped { path: PathBuf },
}

impl DownloadOutcome {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded { path, .. } | Self::Skipped { path } => path.as_path(),
        }
    }
}

/// File name for an image URL, taken from its `id` query parameter.
///
/// Only the last path component of the value is used so the name stays inside
/// the output directory.
#[must_use]
pub fn destination_filename(url: &str) -> String {
    query::build_url::<&str, &str>(BING_BASE_URL, url, &[])
        .ok()
        .and_then(|parsed| {
            parsed
                .query_pairs()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("id"))
                .map(|(_, value)| value.into_owned())
        })
        .and_then(|id| last_component(&id))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

fn last_component(value: &str) -> Option<String> {
    let name = value.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Saves images into one output directory, skipping those already present
#[derive(Debug, Clone)]
pub struct Downloader {
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where an entry's image is stored
    #[must_use]
    pub fn destination(&self, entry: &FeedEntry) -> PathBuf {
        self.output_dir.join(destination_filename(&entry.url))
    }

    /// Download an image through its own fetch capability
    pub async fn download(&self, image: &Image) -> Result<DownloadOutcome> {
        let path = self.destination(image.entry());
        let Some((part, mut file)) = self.prepare(&path).await? else {
            return Ok(DownloadOutcome::Skipped { path });
        };

        let result = image.save(&mut file).await;
        drop(file);

        Self::finish(part, path, result).await
    }

    /// Download an entry through the archive's image endpoint
    pub async fn download_from(
        &self,
        archive: &HpImageArchive,
        entry: &FeedEntry,
    ) -> Result<DownloadOutcome> {
        let path = self.destination(entry);
        let Some((part, mut file)) = self.prepare(&path).await? else {
            return Ok(DownloadOutcome::Skipped { path });
        };

        let result = archive
            .get_image(&entry.url, &mut file)
            .await
            .and_then(|response| response.error_for_status(&entry.url))
            .map(|_| 0);
        drop(file);

        let outcome = Self::finish(part, path, result).await?;
        match outcome {
            DownloadOutcome::Downloaded { path, .. } => {
                let bytes = fs::metadata(&path).await?.len();
                Ok(DownloadOutcome::Downloaded { path, bytes })
            }
            skipped => Ok(skipped),
        }
    }

    /// Open the part file for `path`, or `None` when `path` already exists
    async fn prepare(&self, path: &Path) -> Result<Option<(PathBuf, File)>> {
        if fs::try_exists(path).await? {
            info!("Skipping {}, already exists", path.display());
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir).await?;

        let part = part_path(path);
        let file = File::create(&part).await?;

        Ok(Some((part, file)))
    }

    async fn finish(
        part: PathBuf,
        path: PathBuf,
        result: Result<u64>,
    ) -> Result<DownloadOutcome> {
        match result {
            Ok(bytes) => {
                fs::rename(&part, &path).await?;
                info!("Saved {}", path.display());
                Ok(DownloadOutcome::Downloaded { path, bytes })
            }
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&part).await {
                    warn!("Failed to remove {}: {remove_err}", part.display());
                }
                Err(e)
            }
        }
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".part");
    path.with_file_name(name)
}
