use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use super::{markup, require_content, Fetcher, ProfileSource};
use crate::error::ProfileError;

/// Reads saved profile pages and plain-text exports.
#[derive(Debug, Default)]
pub struct TextFileFetcher;

/// Decode file bytes (invalid UTF-8 replaced) and strip markup the extension or
/// content announces.
pub fn decode_text(path: &Path, bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);
    let raw = raw.trim_start_matches('\u{feff}');
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("md" | "markdown") => markup::markdown_to_text(raw),
        Some("html" | "htm") => markup::html_to_text(raw),
        _ if markup::looks_like_html(raw) => markup::html_to_text(raw),
        _ => raw.to_string(),
    }
}

#[async_trait]
impl Fetcher for TextFileFetcher {
    #[tracing::instrument(skip_all, fields(source = %source))]
    async fn fetch(&self, source: &ProfileSource) -> Result<String, ProfileError> {
        let ProfileSource::File(path) = source else {
            return Err(ProfileError::FetchFailure(format!(
                "text fetcher cannot read {source}"
            )));
        };

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ProfileError::FetchFailure(format!("failed to read {}: {e}", path.display()))
        })?;
        let text = decode_text(path, &bytes);

        info!(bytes = bytes.len(), chars = text.len(), "text file loaded");
        require_content(text)
    }
}
