use std::time::Duration;

use async_trait::async_trait;
use lopdf::Document;
use tracing::{debug, info};

use super::{require_content, Fetcher, ProfileSource};
use crate::error::ProfileError;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
pub struct PdfFetcher;

/// Text of every readable page, pages separated by newlines.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ProfileError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ProfileError::FetchFailure(format!("failed to parse PDF: {e}")))?;

    if doc.is_encrypted() {
        return Err(ProfileError::FetchFailure(
            "PDF is encrypted and could not be decrypted".to_string(),
        ));
    }

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());
    for &page_number in pages.keys() {
        match doc.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => texts.push(text),
            Ok(_) => debug!(page_number, "page has no text layer"),
            Err(e) => debug!(page_number, error = %e, "skipping unreadable page"),
        }
    }

    Ok(texts.join("\n"))
}

#[async_trait]
impl Fetcher for PdfFetcher {
    #[tracing::instrument(skip_all, fields(source = %source))]
    async fn fetch(&self, source: &ProfileSource) -> Result<String, ProfileError> {
        let ProfileSource::Pdf(path) = source else {
            return Err(ProfileError::FetchFailure(format!(
                "PDF fetcher cannot read {source}"
            )));
        };

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ProfileError::FetchFailure(format!("failed to read {}: {e}", path.display()))
        })?;

        let text = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || extract_pdf_text(&bytes)),
        )
        .await
        .map_err(|_| ProfileError::FetchFailure("PDF extraction timed out".to_string()))?
        .map_err(|e| ProfileError::FetchFailure(format!("PDF extraction task failed: {e}")))??;

        info!(chars = text.len(), "PDF text extraction complete");
        require_content(text)
    }
}
