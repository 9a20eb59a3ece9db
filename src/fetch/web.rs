use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::{info, warn};

use super::{markup, require_content, Fetcher, ProfileSource};
use crate::config::FetcherConfig;
use crate::error::ProfileError;

const BASE_BACKOFF_MS: u64 = 2000;

/// Fetches a public profile page. Goes through spider.cloud when an API key is
/// configured, otherwise does a plain GET and strips the HTML.
pub struct WebFetcher {
    http: reqwest::Client,
    spider: Option<Arc<Spider>>,
    max_retries: u32,
}

impl WebFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, ProfileError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProfileError::FetchFailure(format!("failed to build HTTP client: {e}")))?;

        let spider = match &config.spider_api_key {
            Some(key) => {
                let client = Spider::new(Some(key.clone())).map_err(|e| {
                    ProfileError::FetchFailure(format!("failed to create Spider client: {e}"))
                })?;
                Some(Arc::new(client))
            }
            None => None,
        };

        Ok(Self {
            http,
            spider,
            max_retries: config.max_retries,
        })
    }

    async fn scrape_with_retry(&self, spider: &Spider, url: &str) -> Result<String, ProfileError> {
        let mut attempt = 0;
        loop {
            match scrape_markdown(spider, url).await {
                Ok(markdown) => return Ok(markdown),
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        status = e.status,
                        backoff_secs = backoff.as_secs_f64(),
                        "transient scrape failure, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(ProfileError::FetchFailure(e.message)),
            }
        }
    }

    async fn get_html(&self, url: &str) -> Result<String, ProfileError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProfileError::FetchFailure(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::FetchFailure(format!("{url} returned {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| ProfileError::FetchFailure(format!("failed to read body of {url}: {e}")))
    }
}

#[async_trait]
impl Fetcher for WebFetcher {
    #[tracing::instrument(skip_all, fields(source = %source))]
    async fn fetch(&self, source: &ProfileSource) -> Result<String, ProfileError> {
        let ProfileSource::Url(url) = source else {
            return Err(ProfileError::FetchFailure(format!(
                "web fetcher cannot read {source}"
            )));
        };
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ProfileError::FetchFailure(format!("not an http(s) URL: {url}")));
        }

        let start = Instant::now();
        let text = match &self.spider {
            Some(spider) => markup::markdown_to_text(&self.scrape_with_retry(spider, url).await?),
            None => markup::html_to_text(&self.get_html(url).await?),
        };

        info!(
            slug = profile_slug(url).as_deref().unwrap_or("-"),
            chars = text.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "profile page fetched"
        );
        require_content(text)
    }
}

/// A failed scrape and the HTTP status behind it, when there was one.
#[derive(Debug)]
struct ScrapeError {
    status: Option<u16>,
    message: String,
}

impl ScrapeError {
    fn is_retryable(&self) -> bool {
        matches!(self.status, Some(429 | 500..=599))
    }
}

async fn scrape_markdown(spider: &Spider, url: &str) -> Result<String, ScrapeError> {
    let params = RequestParams {
        return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Markdown)),
        ..Default::default()
    };

    let response = spider
        .scrape_url(url, Some(params), "application/json")
        .await
        .map_err(|e| ScrapeError {
            status: e.status().map(|s| s.as_u16()),
            message: format!("Spider scrape failed: {e}"),
        })?;

    let parsed: serde_json::Value = match response.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
        None => response,
    };
    let first = parsed.as_array().and_then(|arr| arr.first());

    if let Some(status) = first.and_then(|obj| obj.get("status")).and_then(|s| s.as_i64()) {
        if status >= 400 {
            return Err(ScrapeError {
                status: u16::try_from(status).ok(),
                message: format!("Spider returned status {status} for {url}"),
            });
        }
    }

    first
        .and_then(|obj| obj.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| ScrapeError {
            status: None,
            message: "no content in Spider response".to_string(),
        })
}

/// Public handle from a profile URL: `https://www.linkedin.com/in/<slug>/`.
pub fn profile_slug(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/in/")?;
    let slug = rest.split(['/', '?', '#']).next()?.trim();
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}
