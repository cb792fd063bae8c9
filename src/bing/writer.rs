use super::{BingError, Result, types::FeedEntry};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

pub struct Writer;

impl Writer {
    /// Sidecar location for an image: same directory and stem, `.json` extension
    #[must_use]
    pub fn sidecar_path(image_path: &Path) -> PathBuf {
        image_path.with_extension("json")
    }

    /// Write the entry's raw feed object next to its image.
    ///
    /// Returns `None` when the sidecar already exists.
    pub async fn write_sidecar(image_path: &Path, entry: &FeedEntry) -> Result<Option<PathBuf>> {
        let path = Self::sidecar_path(image_path);
        if tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }

        let json = serde_json::to_string_pretty(&entry.raw)
            .map_err(|e| BingError::Parse(format!("JSON encode error: {e}")))?;

        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;

        info!("Wrote metadata {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod test {
    use super::Writer;
    use crate::bing::parse_feed;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            Writer::sidecar_path(Path::new("out/OHR.Example_EN-US123456.jpg")),
            Path::new("out/OHR.Example_EN-US123456.json")
        );
    }

    #[tokio::test]
    async fn test_write_sidecar_once() {
        let dir = TempDir::new().unwrap();
        let image_path = dir.path().join("a.jpg");
        let entries =
            parse_feed(br#"{"images": [{"url": "/th?id=a.jpg", "title": "First"}]}"#).unwrap();

        let written = Writer::write_sidecar(&image_path, &entries[0]).await.unwrap();
        let path = written.unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["title"], "First");

        let again = Writer::write_sidecar(&image_path, &entries[0]).await.unwrap();
        assert!(again.is_none());
    }
}
