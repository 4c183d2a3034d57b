//! check command: Verify local links in markdown documents
//!
//! Progress goes to stderr; the summary (or compact JSON with `--json`)
//! goes to stdout. Exit status is 1 when any link is broken.

use crate::discover::{discover_documents, Document, DEFAULT_IGNORE};
use crate::error::Error;
use crate::extract::Extractor;
use crate::resolve::Resolver;
use crate::schema::{CheckedLink, FileReport, Report};
use crate::storage::{FsStorage, Storage};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Args)]
pub struct CheckArgs {
    /// Directory to check
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    directory: PathBuf,

    /// Glob pattern for documents, relative to DIRECTORY
    #[arg(short, long, default_value = "**/*.md")]
    pattern: String,

    /// Patterns to ignore, relative to DIRECTORY
    #[arg(short, long, num_args = 1.., default_values = DEFAULT_IGNORE.iter().copied())]
    ignore: Vec<String>,

    /// Documentation subdirectory tried as site root for "/..." links
    #[arg(long, default_value = "docs", env = "DOCLINKS_DOCS_DIR")]
    docs_dir: String,

    /// Links resolved in parallel per document (1-20)
    #[arg(short, long, default_value = "1", env = "DOCLINKS_CONCURRENCY",
          value_parser = clap::value_parser!(u8).range(1..=20))]
    concurrency: u8,

    /// Save the report to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the saved report
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
    format: ReportFormat,

    /// Print the report as compact JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Suppress per-file progress
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
}

/// Configuration for a check run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub root: PathBuf,
    pub pattern: String,
    pub ignore: Vec<String>,
    pub docs_dir: String,
    pub concurrency: usize,
    pub progress: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pattern: "**/*.md".to_string(),
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            docs_dir: "docs".to_string(),
            concurrency: 1,
            progress: false,
        }
    }
}

impl From<&CheckArgs> for CheckConfig {
    fn from(args: &CheckArgs) -> Self {
        Self {
            root: args.directory.clone(),
            pattern: args.pattern.clone(),
            ignore: args.ignore.clone(),
            docs_dir: args.docs_dir.clone(),
            concurrency: args.concurrency as usize,
            progress: !args.quiet,
        }
    }
}

/// Run the check command
pub async fn run_check_links(args: CheckArgs) -> Result<ExitCode> {
    let config = CheckConfig::from(&args);

    let report = check_links(&config)
        .await
        .with_context(|| format!("Failed to check {}", args.directory.display()))?;

    if let Some(output) = &args.output {
        save_report(&report, output, args.format).await?;
        eprintln!("Report saved to: {}", output.display());
    }

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print!("{}", render_summary(&report));
    }

    Ok(if report.summary.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Discover and check every document under `config.root` on the local
/// filesystem.
pub async fn check_links(config: &CheckConfig) -> Result<Report, Error> {
    let root = tokio::fs::canonicalize(&config.root)
        .await
        .map_err(|source| Error::RootNotFound {
            path: config.root.clone(),
            source,
        })?;

    let documents = discover_documents(&root, &config.pattern, &config.ignore)?;
    if config.progress {
        eprintln!(
            "Checking {} markdown file{} in {}...",
            documents.len(),
            if documents.len() == 1 { "" } else { "s" },
            config.root.display()
        );
    }

    let storage = FsStorage;
    let checker = Checker::new(&storage, &root, config)?;
    checker.check_all(&documents).await
}

/// Drives extraction and resolution for documents under one root
pub struct Checker<'a, S> {
    storage: &'a S,
    extractor: Extractor,
    resolver: Resolver<'a, S>,
    concurrency: usize,
    progress: bool,
}

impl<'a, S: Storage> Checker<'a, S> {
    /// `root` must be the resolved document root the documents live under.
    pub fn new(storage: &'a S, root: &Path, config: &CheckConfig) -> Result<Self, Error> {
        Ok(Self {
            storage,
            extractor: Extractor::new()?,
            resolver: Resolver::new(storage, root, &config.docs_dir),
            concurrency: config.concurrency.max(1),
            progress: config.progress,
        })
    }

    /// Check documents one after another and fold the results.
    ///
    /// A document that cannot be read aborts the run.
    pub async fn check_all(&self, documents: &[Document]) -> Result<Report, Error> {
        let mut files = Vec::with_capacity(documents.len());

        for document in documents {
            let content = self
                .storage
                .read_text(&document.path)
                .await
                .map_err(|source| Error::ReadDocument {
                    path: document.path.clone(),
                    source,
                })?;

            let file = self.check_document(document, &content).await;
            if self.progress && !file.links.is_empty() {
                eprintln!("  -> {} ({} links)", file.file, file.links.len());
            }
            files.push(file);
        }

        Ok(Report::collect(documents.len(), files))
    }

    /// Resolve every link of one document, keeping discovery order.
    pub async fn check_document(&self, document: &Document, content: &str) -> FileReport {
        let links: Vec<_> = self.extractor.extract(content).collect();

        // buffered() yields in input order regardless of completion order
        let results: Vec<_> = stream::iter(&links)
            .map(|link| self.resolver.resolve(&link.target, &document.path))
            .buffered(self.concurrency)
            .collect()
            .await;

        FileReport {
            file: document.relative.clone(),
            links: links
                .into_iter()
                .zip(results)
                .map(|(link, result)| CheckedLink { link, result })
                .collect(),
        }
    }
}

/// Human-readable summary
pub fn render_summary(report: &Report) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str("\nLink Check Summary\n");
    out.push_str(&format!("{}\n", "-".repeat(40)));
    out.push_str(&format!("Total files checked: {}\n", summary.total_files));
    out.push_str(&format!("Total links found: {}\n", summary.total_links));

    if summary.success {
        out.push_str("All links are valid!\n");
        return out;
    }

    out.push_str(&format!("Found {} broken links:\n\n", summary.broken_links));
    for broken in &report.broken_links {
        out.push_str(&format!("  {}:{}:{}\n", broken.file, broken.line, broken.column));
        out.push_str(&format!("    Link: [{}]({})\n", broken.text, broken.target));
        out.push_str(&format!("    Reason: {}\n\n", broken.reason));
    }

    out
}

/// Persist `report` to `path`
pub async fn save_report(report: &Report, path: &Path, format: ReportFormat) -> Result<(), Error> {
    let body = match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)?,
        ReportFormat::Yaml => serde_yaml::to_string(report)?,
    };

    tokio::fs::write(path, body)
        .await
        .map_err(|source| Error::WriteReport {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LinkKind;
    use crate::storage::MemoryStorage;
    use std::fs;
    use tempfile::tempdir;

    fn document(path: &str, relative: &str) -> Document {
        Document {
            path: PathBuf::from(path),
            relative: relative.to_string(),
        }
    }

    fn config(concurrency: usize) -> CheckConfig {
        CheckConfig {
            concurrency,
            ..CheckConfig::default()
        }
    }

    #[tokio::test]
    async fn test_broken_and_valid_links() {
        let storage = MemoryStorage::default()
            .with_file("/r/guide.md", "[broken](missing.md)\n[ok](./real.md)\n")
            .with_file("/r/real.md", "# Real\n");
        let checker = Checker::new(&storage, Path::new("/r"), &config(1)).unwrap();

        let report = checker
            .check_all(&[document("/r/guide.md", "guide.md")])
            .await
            .unwrap();

        assert_eq!(report.summary.total_links, 2);
        assert_eq!(report.summary.broken_links, 1);
        assert!(!report.summary.success);
        assert_eq!(report.broken_links[0].reason, "File not found");
        assert_eq!(report.broken_links[0].target, "missing.md");
        assert_eq!(report.broken_links[0].line, 1);
        assert_eq!(report.broken_links[0].column, 1);
    }

    #[tokio::test]
    async fn test_documents_without_links() {
        let storage = MemoryStorage::default()
            .with_file("/r/a.md", "# Nothing to see\n")
            .with_file("/r/b.md", "[self](b.md)\n");
        let checker = Checker::new(&storage, Path::new("/r"), &config(1)).unwrap();

        let report = checker
            .check_all(&[document("/r/a.md", "a.md"), document("/r/b.md", "b.md")])
            .await
            .unwrap();

        assert_eq!(report.summary.total_files, 2);
        assert_eq!(report.summary.total_links, 1);
        assert!(report.summary.success);
        assert_eq!(report.file_details.len(), 1);
        assert!(report.file_details.contains_key("b.md"));
    }

    #[tokio::test]
    async fn test_order_independent_of_concurrency() {
        let content = "\
[a](a.md) [ext](https://example.com) [b](missing.md#x)
[c](c.md#c) [mail](mailto:a@b.c)
[d](d.md)
";
        let storage = MemoryStorage::default()
            .with_file("/r/index.md", content)
            .with_file("/r/a.md", "# A")
            .with_file("/r/c.md", "# C")
            .with_failure("/r/d.md");
        let doc = document("/r/index.md", "index.md");

        let sequential = Checker::new(&storage, Path::new("/r"), &config(1))
            .unwrap()
            .check_document(&doc, content)
            .await;
        let parallel = Checker::new(&storage, Path::new("/r"), &config(8))
            .unwrap()
            .check_document(&doc, content)
            .await;

        assert_eq!(sequential, parallel);
        let kinds: Vec<_> = sequential.links.iter().map(|c| c.result.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LinkKind::Internal,
                LinkKind::External,
                LinkKind::Internal,
                LinkKind::Internal,
                LinkKind::Email,
                LinkKind::Error,
            ]
        );
    }

    #[tokio::test]
    async fn test_unreadable_document_is_fatal() {
        let storage = MemoryStorage::default().with_failure("/r/locked.md");
        let checker = Checker::new(&storage, Path::new("/r"), &config(1)).unwrap();

        let err = checker
            .check_all(&[document("/r/locked.md", "locked.md")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReadDocument { .. }));
    }

    #[tokio::test]
    async fn test_check_links_on_disk() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs/guide")).unwrap();
        fs::create_dir_all(root.join("docs/api")).unwrap();
        fs::write(
            root.join("docs/guide/intro.md"),
            "# Intro\n\nSee [types](../api/types#user-type) and [home](/guide/intro).\n",
        )
        .unwrap();
        fs::write(root.join("docs/api/types.md"), "# Types\n\n## User Type\n").unwrap();

        let config = CheckConfig {
            root: root.to_path_buf(),
            ..CheckConfig::default()
        };
        let report = check_links(&config).await.unwrap();

        assert_eq!(report.summary.total_files, 2);
        assert_eq!(report.summary.total_links, 2);
        assert!(report.summary.success, "{:?}", report.broken_links);
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let config = CheckConfig {
            root: dir.path().join("nope"),
            ..CheckConfig::default()
        };
        let err = check_links(&config).await.unwrap_err();
        assert!(matches!(err, Error::RootNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_document_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0xfd]).unwrap();
        let config = CheckConfig {
            root: dir.path().to_path_buf(),
            ..CheckConfig::default()
        };
        let err = check_links(&config).await.unwrap_err();
        assert!(err.to_string().contains("bad.md"));
    }

    #[tokio::test]
    async fn test_render_summary() {
        let storage = MemoryStorage::default()
            .with_file("/r/guide.md", "Intro [broken](missing.md)\n");
        let checker = Checker::new(&storage, Path::new("/r"), &config(1)).unwrap();
        let report = checker
            .check_all(&[document("/r/guide.md", "guide.md")])
            .await
            .unwrap();

        let text = render_summary(&report);
        assert!(text.contains("Total files checked: 1"));
        assert!(text.contains("Found 1 broken links:"));
        assert!(text.contains("  guide.md:1:7"));
        assert!(text.contains("    Link: [broken](missing.md)"));
        assert!(text.contains("    Reason: File not found"));

        let clean = Report::collect(3, Vec::new());
        assert!(render_summary(&clean).contains("All links are valid!"));
    }

    #[tokio::test]
    async fn test_save_report_formats() {
        let dir = tempdir().unwrap();
        let report = Report::collect(1, Vec::new());

        let json_path = dir.path().join("report.json");
        save_report(&report, &json_path, ReportFormat::Json).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["summary"]["totalFiles"], 1);
        assert_eq!(json["summary"]["success"], true);

        let yaml_path = dir.path().join("report.yaml");
        save_report(&report, &yaml_path, ReportFormat::Yaml).await.unwrap();
        let yaml = fs::read_to_string(&yaml_path).unwrap();
        assert!(yaml.contains("totalFiles: 1"));

        let err = save_report(&report, &dir.path().join("no/such/dir.json"), ReportFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WriteReport { .. }));
    }
}
