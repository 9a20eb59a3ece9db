pub mod markup;
pub mod pdf;
pub mod text;
pub mod web;

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::FetcherConfig;
use crate::error::ProfileError;
use crate::parser::normalize::normalize;

pub use pdf::PdfFetcher;
pub use text::TextFileFetcher;
pub use web::WebFetcher;

/// Fewer non-whitespace characters than this means extraction found nothing.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Where a profile's raw text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    Url(String),
    Pdf(PathBuf),
    File(PathBuf),
}

impl ProfileSource {
    /// Local file source, PDF or text depending on the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if is_pdf(&path) {
            Self::Pdf(path)
        } else {
            Self::File(path)
        }
    }
}

impl fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Pdf(path) | Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Raw profile text, already checked against [`MIN_CONTENT_CHARS`].
    async fn fetch(&self, source: &ProfileSource) -> Result<String, ProfileError>;
}

/// Minimum-content gate every fetcher applies before handing text on.
pub fn require_content(text: String) -> Result<String, ProfileError> {
    let found = normalize(&text).content_chars();
    if found < MIN_CONTENT_CHARS {
        return Err(ProfileError::EmptyExtraction { found });
    }
    Ok(text)
}

/// Blocking read of a local PDF or text file, for callers outside the runtime.
pub fn read_local(path: &Path) -> Result<String, ProfileError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ProfileError::FetchFailure(format!("failed to read {}: {e}", path.display()))
    })?;
    let text = if is_pdf(path) {
        pdf::extract_pdf_text(&bytes)?
    } else {
        text::decode_text(path, &bytes)
    };
    require_content(text)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Routes each source kind to its fetcher.
pub struct CompositeFetcher {
    web: WebFetcher,
    pdf: PdfFetcher,
    text: TextFileFetcher,
}

impl CompositeFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, ProfileError> {
        Ok(Self {
            web: WebFetcher::new(config)?,
            pdf: PdfFetcher,
            text: TextFileFetcher,
        })
    }
}

#[async_trait]
impl Fetcher for CompositeFetcher {
    async fn fetch(&self, source: &ProfileSource) -> Result<String, ProfileError> {
        match source {
            ProfileSource::Url(_) => self.web.fetch(source).await,
            ProfileSource::Pdf(_) => self.pdf.fetch(source).await,
            ProfileSource::File(_) => self.text.fetch(source).await,
        }
    }
}
