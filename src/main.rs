mod analysis;
mod config;
mod error;
mod fetch;
mod parser;
mod profile;
mod prompt;
mod summarize;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::ProfileError;
use crate::fetch::{CompositeFetcher, ProfileSource};
use crate::profile::{ProfileRecord, Section};
use crate::summarize::OpenAiSummarizer;

const BATCH_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "html", "htm", "pdf"];

#[derive(Parser)]
#[command(
    name = "linkedingest",
    version,
    about = "Split LinkedIn profiles into sections and summarize them"
)]
struct Cli {
    /// TOML config file (env LINKEDINGEST_* overrides it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a local profile (text, HTML, markdown or PDF) and print the record as JSON
    Segment { path: PathBuf },
    /// Print the summarizer prompt built from a local profile
    Prompt {
        path: PathBuf,
        #[arg(short, long, default_value = prompt::DEFAULT_TONE)]
        tone: String,
        /// Extra context appended to the prompt
        #[arg(long)]
        context: Option<String>,
    },
    /// Fetch, segment and summarize one profile
    #[command(group(ArgGroup::new("source").required(true).args(["url", "pdf", "file"])))]
    Analyze {
        /// Public profile URL
        #[arg(long)]
        url: Option<String>,
        /// Profile exported as PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Profile saved as text, markdown or HTML
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(short, long, default_value = prompt::DEFAULT_TONE)]
        tone: String,
        #[arg(long)]
        context: Option<String>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Segment every profile file in a directory, one JSON line each
    Batch {
        dir: PathBuf,
        /// Max files to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print service status
    Health,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        for (depth, cause) in err.chain().enumerate() {
            if depth == 0 {
                error!("{cause}");
            } else {
                error!("  caused by: {cause}");
            }
        }
        let code = err
            .chain()
            .find_map(|c| c.downcast_ref::<ProfileError>())
            .map_or(1, ProfileError::exit_code);
        std::process::exit(code);
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("done in {}", format_duration(elapsed));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Segment { path } => {
            let record = segment_local(&path)?;
            if record.is_empty() {
                warn!(path = %path.display(), "no sections recognized");
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Prompt {
            path,
            tone,
            context,
        } => {
            let record = segment_local(&path)?;
            println!("{}", prompt::build_prompt(&record, &tone, context.as_deref()));
            Ok(())
        }
        Commands::Analyze {
            url,
            pdf,
            file,
            tone,
            context,
            json,
        } => {
            let source = match (url, pdf, file) {
                (Some(url), _, _) => ProfileSource::Url(url),
                (_, Some(pdf), _) => ProfileSource::Pdf(pdf),
                (_, _, Some(file)) => ProfileSource::from_path(file),
                _ => anyhow::bail!("one of --url, --pdf or --file is required"),
            };
            let settings = Settings::load(cli.config.as_deref())?;
            let fetcher = CompositeFetcher::new(&settings.fetcher)?;
            let summarizer = OpenAiSummarizer::new(settings.summarizer)?;

            let report =
                analysis::analyze(&source, &fetcher, &summarizer, &tone, context.as_deref())
                    .await
                    .with_context(|| format!("failed to analyze {source}"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Name:         {}", report.name);
                println!("Current Role: {}", report.current_role);
                println!("Company:      {}", report.company);
                println!("\n{}", report.summary);
            }
            Ok(())
        }
        Commands::Batch { dir, limit } => {
            let files = list_profiles(&dir, limit)?;
            if files.is_empty() {
                println!("No profile files found in {}.", dir.display());
                return Ok(());
            }
            info!(files = files.len(), dir = %dir.display(), "segmenting batch");
            let counts = segment_files(&files)?;
            counts.print();
            Ok(())
        }
        Commands::Health => {
            let status = serde_json::json!({
                "status": "healthy",
                "service": "linkedingest",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            });
            println!("{status}");
            Ok(())
        }
    }
}

/// Read and segment a local PDF or text file.
fn segment_local(path: &Path) -> anyhow::Result<ProfileRecord> {
    let text = fetch::read_local(path)?;
    Ok(parser::segment(&text))
}

fn list_profiles(dir: &Path, limit: Option<usize>) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        let wanted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| BATCH_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if path.is_file() && wanted {
            files.push(path);
        }
    }
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    Ok(files)
}

struct BatchCounts {
    files: usize,
    ok: usize,
    errors: usize,
    dropped: usize,
    filled: [usize; Section::ALL.len()],
}

impl BatchCounts {
    fn record(&mut self, record: &ProfileRecord, dropped: usize) {
        self.ok += 1;
        self.dropped += dropped;
        for section in record.filled() {
            self.filled[section.index()] += 1;
        }
    }

    fn print(&self) {
        eprintln!(
            "Segmented {} files ({} ok, {} errors), {} lines dropped.",
            self.files, self.ok, self.errors, self.dropped
        );
        for section in Section::ALL {
            eprintln!("  {:<15} {}", section.label(), self.filled[section.index()]);
        }
    }
}

fn segment_files(files: &[PathBuf]) -> anyhow::Result<BatchCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = BatchCounts {
        files: files.len(),
        ok: 0,
        errors: 0,
        dropped: 0,
        filled: [0; Section::ALL.len()],
    };

    for chunk in files.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| fetch::read_local(path).map(|text| parser::segment_with_stats(&text)))
            .collect();

        for (path, result) in chunk.iter().zip(results) {
            let line = match result {
                Ok((record, stats)) => {
                    counts.record(&record, stats.dropped);
                    serde_json::json!({
                        "path": path,
                        "record": record,
                        "dropped": stats.dropped,
                    })
                }
                Err(e) => {
                    counts.errors += 1;
                    serde_json::json!({
                        "path": path,
                        "error": { "kind": e.kind(), "message": e.to_string() },
                    })
                }
            };
            pb.suspend(|| println!("{line}"));
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cli_parses_analyze_sources() {
        let cli = Cli::try_parse_from(["linkedingest", "analyze", "--pdf", "cv.pdf", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Analyze { pdf: Some(_), json: true, .. }
        ));
        assert!(Cli::try_parse_from(["linkedingest", "analyze"]).is_err());
        assert!(Cli::try_parse_from([
            "linkedingest", "analyze", "--url", "https://x/in/y", "--file", "cv.txt"
        ])
        .is_err());
    }

    #[test]
    fn prompt_tone_defaults() {
        let cli = Cli::try_parse_from(["linkedingest", "prompt", "cv.txt"]).unwrap();
        match cli.command {
            Commands::Prompt { tone, context, .. } => {
                assert_eq!(tone, "professional");
                assert!(context.is_none());
            }
            _ => panic!("expected prompt command"),
        }
    }

    #[test]
    fn segments_local_html_and_text() {
        let record = segment_local(Path::new("tests/fixtures/profile_page.html")).unwrap();
        assert_eq!(record.get(Section::Name), "Jane Doe");
        let record = segment_local(Path::new("tests/fixtures/linkedin_export.txt")).unwrap();
        assert!(!record.get(Section::Experience).is_empty());

        let err = segment_local(Path::new("tests/fixtures/missing.txt")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProfileError>().map(ProfileError::exit_code),
            Some(2)
        );
    }

    #[test]
    fn lists_only_profile_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.PDF", "c.html", "notes.json", "d.md"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = list_profiles(dir.path(), None).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.txt", "c.html", "d.md"]);
        assert_eq!(list_profiles(dir.path(), Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn batch_counts_filled_sections() {
        let files = vec![
            PathBuf::from("tests/fixtures/linkedin_export.txt"),
            PathBuf::from("tests/fixtures/resume_repeated_header.txt"),
            PathBuf::from("tests/fixtures/missing.txt"),
        ];
        let counts = segment_files(&files).unwrap();
        assert_eq!(counts.ok, 2);
        assert_eq!(counts.errors, 1);
        assert_eq!(counts.filled[Section::Name.index()], 2);
        assert_eq!(counts.filled[Section::Languages.index()], 1);
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
