//! Download-once image fetcher.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Posters for movie-like categories.
pub const POSTERS_DIR: &str = "posters";
/// Posters for shows.
pub const SHOW_POSTERS_DIR: &str = "posters_tv";
/// Backdrops, when backdrop caching is enabled.
pub const BACKDROPS_DIR: &str = "backdrops";

/// Fetches remote images into `<output_dir>/<subdir>/`.
///
/// # Example
///
/// ```rust,ignore
/// let fetcher = AssetFetcher::new(client, &output_dir, POSTERS_DIR);
/// let local = fetcher.localize("https://image.tmdb.org/t/p/w342/abc.jpg", "m1").await;
/// assert_eq!(local, "posters/abc.jpg");
/// ```
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    dir: PathBuf,
    subdir: String,
}

impl AssetFetcher {
    pub fn new(client: reqwest::Client, output_dir: &Path, subdir: &str) -> Self {
        Self {
            client,
            dir: output_dir.join(subdir),
            subdir: subdir.to_string(),
        }
    }

    /// Return a catalog-relative path (`"<subdir>/<file>"`) for `url`.
    ///
    /// An already downloaded file is reused. Otherwise the image is streamed
    /// to a `.part` file and renamed into place. Any failure logs a warning
    /// and returns `url` unchanged. An empty `url` returns an empty string.
    pub async fn localize(&self, url: &str, fallback_id: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        let filename = file_name_for(url, fallback_id);
        let relative = format!("{}/{}", self.subdir, filename);
        let dest = self.dir.join(&filename);

        if dest.is_file() {
            return relative;
        }

        match self.download(url, &dest).await {
            Ok(()) => {
                debug!(url = url, path = ?dest, "Cached image");
                relative
            }
            Err(e) => {
                warn!(url = url, error = %format!("{e:#}"), "Image download failed; keeping remote URL");
                url.to_string()
            }
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create image directory: {}", self.dir.display()))?;

        let part = part_path(dest);
        let result = self.stream_to(url, &part).await;
        match result {
            Ok(()) => tokio::fs::rename(&part, dest)
                .await
                .with_context(|| format!("Failed to move {} into place", part.display())),
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                Err(e)
            }
        }
    }

    async fn stream_to(&self, url: &str, part: &Path) -> Result<()> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download image from {}", url))?
            .error_for_status()
            .with_context(|| format!("HTTP error downloading image from {}", url))?;

        let mut file = tokio::fs::File::create(part)
            .await
            .with_context(|| format!("Failed to create {}", part.display()))?;
        while let Some(chunk) = resp
            .chunk()
            .await
            .with_context(|| format!("Failed to read image bytes from {}", url))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

/// Basename of the URL path, or `<fallback_id>.jpg` when it has none.
fn file_name_for(url: &str, fallback_id: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{fallback_id}.jpg"))
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
