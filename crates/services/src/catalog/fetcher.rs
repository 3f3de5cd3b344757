use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// Read-only access to the published catalog, addressed by relative paths
/// such as `test_sets/` or `question_json/question_1.json`.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the resource at `path` as text.
    ///
    /// A path ending in `/` names a directory and yields its HTML listing.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the resource is missing or cannot be read.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetch `path` and decode it as JSON.
///
/// # Errors
///
/// Returns `FetchError::InvalidJson` when the body is not JSON, or any error
/// from the underlying fetch.
pub async fn fetch_json(fetcher: &dyn ResourceFetcher, path: &str) -> Result<Value, FetchError> {
    let body = fetcher.fetch_text(path).await?;
    serde_json::from_str(&body).map_err(|source| FetchError::InvalidJson {
        path: path.to_string(),
        source,
    })
}

/// Split a relative resource path into its segments, rejecting anything
/// that could escape the catalog root.
fn segments(path: &str) -> Result<Vec<&str>, FetchError> {
    if path.starts_with('/') || path.contains('\\') {
        return Err(FetchError::InvalidPath(path.to_string()));
    }
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.iter().any(|s| *s == "." || *s == "..") {
        return Err(FetchError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Fetches from a static HTTP server. Every request bypasses caches.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Join `path` onto the base URL, percent-encoding each segment.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidPath` for paths that leave the base or a
    /// base URL that cannot carry a path.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        let parts = segments(path)?;
        let mut url = self.base.clone();
        {
            let mut out = url
                .path_segments_mut()
                .map_err(|()| FetchError::InvalidPath(path.to_string()))?;
            out.pop_if_empty();
            out.extend(&parts);
            if path.ends_with('/') {
                out.push("");
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, %status, "fetch failed");
            return Err(FetchError::HttpStatus {
                path: path.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

//
// ─── DIRECTORY ─────────────────────────────────────────────────────────────────
//

/// Serves the catalog from a local directory with the same layout a static
/// server would publish.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let mut full = self.root.clone();
        for part in segments(path)? {
            let mut components = Path::new(part).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => full.push(part),
                _ => return Err(FetchError::InvalidPath(path.to_string())),
            }
        }
        Ok(full)
    }
}

#[async_trait]
impl ResourceFetcher for DirectoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full = self.resolve(path)?;
        let io_error = |source| FetchError::Io {
            path: path.to_string(),
            source,
        };

        let metadata = tokio::fs::metadata(&full).await.map_err(io_error)?;
        if metadata.is_dir() {
            return render_index(&full).await.map_err(io_error);
        }
        tokio::fs::read_to_string(&full).await.map_err(io_error)
    }
}

/// Render a minimal autoindex page: a parent link, then one anchor per entry,
/// directories suffixed with `/`.
async fn render_index(dir: &Path) -> std::io::Result<String> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let suffix = if entry.file_type().await?.is_dir() { "/" } else { "" };
        names.push(format!("{name}{suffix}"));
    }
    names.sort();

    let mut html = String::from("<html><body><pre>\n<a href=\"../\">../</a>\n");
    for name in names {
        let href = match name.strip_suffix('/') {
            Some(dir) => format!("{}/", urlencoding::encode(dir)),
            None => urlencoding::encode(&name).into_owned(),
        };
        html.push_str(&format!("<a href=\"{href}\">{name}</a>\n"));
    }
    html.push_str("</pre></body></html>\n");
    Ok(html)
}
