use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::ProfileError;
use crate::fetch::{web::profile_slug, Fetcher, ProfileSource};
use crate::parser;
use crate::profile::ProfileRecord;
use crate::prompt::build_prompt;
use crate::summarize::Summarizer;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    pub slug: Option<String>,
    pub name: String,
    pub current_role: String,
    pub company: String,
    pub summary: String,
    pub llm_prompt: String,
    pub record: ProfileRecord,
    pub generated_at: String,
}

/// Headline fields the summary is asked to state on their own lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub name: String,
    pub current_role: String,
    pub company: String,
}

impl Default for SummaryFields {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            current_role: UNKNOWN.to_string(),
            company: UNKNOWN.to_string(),
        }
    }
}

/// Pick `Name:`, `Current Role:` and `Company:` lines out of generated prose.
/// The label must open the line, after any list or emphasis markers. Later
/// lines win; anything not found stays `Unknown`.
pub fn parse_summary_fields(summary: &str) -> SummaryFields {
    let mut fields = SummaryFields::default();
    for line in summary.lines() {
        if let Some(value) = field_value(line, "Name:") {
            fields.name = value;
        } else if let Some(value) = field_value(line, "Current Role:") {
            fields.current_role = value;
        } else if let Some(value) = field_value(line, "Company:") {
            fields.company = value;
        }
    }
    fields
}

fn field_value(line: &str, label: &str) -> Option<String> {
    let line = line.trim_start_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_digit() || matches!(c, '*' | '-' | '#' | '.' | '_')
    });
    let rest = line.strip_prefix(label)?;
    let value = rest.trim().trim_matches('*').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Fetch, segment, prompt and summarize one profile.
#[tracing::instrument(skip_all, fields(source = %source, tone = %tone))]
pub async fn analyze(
    source: &ProfileSource,
    fetcher: &dyn Fetcher,
    summarizer: &dyn Summarizer,
    tone: &str,
    context: Option<&str>,
) -> Result<AnalysisReport, ProfileError> {
    let raw = fetcher.fetch(source).await?;
    let (record, stats) = parser::segment_with_stats(&raw);
    info!(
        lines = stats.lines,
        headers = stats.headers,
        dropped = stats.dropped,
        sections = record.filled().count(),
        "profile segmented"
    );

    let llm_prompt = build_prompt(&record, tone, context);
    let summary = summarizer.summarize(&llm_prompt).await?;
    let fields = parse_summary_fields(&summary);

    Ok(AnalysisReport {
        source: source.to_string(),
        slug: match source {
            ProfileSource::Url(url) => profile_slug(url),
            _ => None,
        },
        name: fields.name,
        current_role: fields.current_role,
        company: fields.company,
        summary,
        llm_prompt,
        record,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
