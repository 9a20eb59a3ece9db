use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "LINKEDINGEST";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub summarizer: SummarizerConfig,
    pub fetcher: FetcherConfig,
}

/// Everything the summarizer client needs, handed over at construction.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub system_prompt: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            timeout_secs: 30,
            system_prompt: "You are a professional profile summarizer. Create concise, relevant \
                            summaries for networking purposes."
                .to_string(),
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub spider_api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            spider_api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            user_agent: concat!("linkedingest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for FetcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("spider_api_key", &self.spider_api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Settings {
    /// Defaults, then the optional file, then `LINKEDINGEST_*` variables
    /// (`LINKEDINGEST_SUMMARIZER__MODEL=gpt-4o`). The conventional
    /// `OPENAI_API_KEY` / `SPIDER_API_KEY` fill any secret still unset.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        Ok(settings.with_fallback_keys(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("SPIDER_API_KEY").ok(),
        ))
    }

    fn with_fallback_keys(mut self, openai: Option<String>, spider: Option<String>) -> Self {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.summarizer.api_key) {
            self.summarizer.api_key = openai.filter(|k| !k.trim().is_empty());
        }
        if blank(&self.fetcher.spider_api_key) {
            self.fetcher.spider_api_key = spider.filter(|k| !k.trim().is_empty());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_service_expectations() {
        let s = Settings::default();
        assert_eq!(s.summarizer.model, "gpt-3.5-turbo");
        assert_eq!(s.summarizer.max_tokens, 300);
        assert!((s.summarizer.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(s.fetcher.max_retries, 3);
        assert!(s.fetcher.spider_api_key.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[summarizer]\nmodel = \"gpt-4o-mini\"\nmax_tokens = 500\n\n[fetcher]\nmax_retries = 1"
        )
        .unwrap();

        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(s.summarizer.model, "gpt-4o-mini");
        assert_eq!(s.summarizer.max_tokens, 500);
        assert_eq!(s.summarizer.base_url, "https://api.openai.com/v1");
        assert_eq!(s.fetcher.max_retries, 1);
    }

    #[test]
    fn fallback_keys_fill_only_blanks() {
        let mut s = Settings::default();
        s.summarizer.api_key = Some("configured".into());
        let s = s.with_fallback_keys(Some("env-openai".into()), Some("env-spider".into()));
        assert_eq!(s.summarizer.api_key.as_deref(), Some("configured"));
        assert_eq!(s.fetcher.spider_api_key.as_deref(), Some("env-spider"));

        let s = Settings::default().with_fallback_keys(Some("   ".into()), None);
        assert!(s.summarizer.api_key.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut s = Settings::default();
        s.summarizer.api_key = Some("sk-secret".into());
        s.fetcher.spider_api_key = Some("spider-secret".into());
        let out = format!("{:?}", s);
        assert!(!out.contains("sk-secret"));
        assert!(!out.contains("spider-secret"));
        assert!(out.contains("<redacted>"));
    }
}
