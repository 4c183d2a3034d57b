//! Link check data model
//!
//! Values produced by extraction and resolution, and the report shape
//! persisted by the check command.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Which markdown construct a link was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkForm {
    /// `[label](target)`
    Inline,
    /// `[label][refId]`
    Reference,
    /// `[refId]: target` at line start
    Definition,
}

/// A link found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOccurrence {
    /// 1-based line number
    pub line: usize,
    /// 1-based character offset of the match start
    pub column: usize,
    /// Human-readable label
    pub text: String,
    /// Target as written, fragment included
    pub target: String,
    /// Full matched text
    pub raw: String,
    pub form: LinkForm,
}

/// Why a verdict was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// http(s) target, never probed
    External,
    /// mailto: target
    Email,
    /// Local file target
    Internal,
    /// Target file exists, fragment does not
    Anchor,
    /// Storage failed while probing
    Error,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::External => write!(f, "external"),
            LinkKind::Email => write!(f, "email"),
            LinkKind::Internal => write!(f, "internal"),
            LinkKind::Anchor => write!(f, "anchor"),
            LinkKind::Error => write!(f, "error"),
        }
    }
}

/// Outcome of resolving one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub valid: bool,
    pub kind: LinkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Path that satisfied resolution (internal targets only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<PathBuf>,
}

impl ResolutionResult {
    pub fn external() -> Self {
        Self::ok(LinkKind::External)
    }

    pub fn email() -> Self {
        Self::ok(LinkKind::Email)
    }

    pub fn found(path: PathBuf) -> Self {
        Self {
            valid: true,
            kind: LinkKind::Internal,
            reason: None,
            resolved_path: Some(path),
        }
    }

    pub fn file_not_found() -> Self {
        Self::broken(LinkKind::Internal, "File not found".to_string())
    }

    pub fn anchor_not_found(anchor: &str) -> Self {
        Self::broken(LinkKind::Anchor, format!("Anchor #{} not found", anchor))
    }

    pub fn storage_error(err: &std::io::Error) -> Self {
        Self::broken(LinkKind::Error, err.to_string())
    }

    fn ok(kind: LinkKind) -> Self {
        Self {
            valid: true,
            kind,
            reason: None,
            resolved_path: None,
        }
    }

    fn broken(kind: LinkKind, reason: String) -> Self {
        Self {
            valid: false,
            kind,
            reason: Some(reason),
            resolved_path: None,
        }
    }
}

/// A link paired with its verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedLink {
    #[serde(flatten)]
    pub link: LinkOccurrence,
    #[serde(flatten)]
    pub result: ResolutionResult,
}

/// All links of one document, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path relative to the document root, `/`-separated
    pub file: String,
    pub links: Vec<CheckedLink>,
}

/// Flattened entry for a broken link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub target: String,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_files: usize,
    pub total_links: usize,
    pub broken_links: usize,
    pub success: bool,
}

/// Full check report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: Summary,
    pub broken_links: Vec<BrokenLink>,
    /// Documents with at least one link, keyed by relative path
    pub file_details: BTreeMap<String, Vec<CheckedLink>>,
    /// RFC 3339 time the report was assembled
    pub checked_at: String,
}

impl Report {
    /// Fold per-document results into a report.
    ///
    /// `total_files` counts every document checked, including those without
    /// links, which do not appear in `file_details`.
    pub fn collect(total_files: usize, files: impl IntoIterator<Item = FileReport>) -> Self {
        let mut broken_links = Vec::new();
        let mut file_details = BTreeMap::new();
        let mut total_links = 0;

        for file in files {
            if file.links.is_empty() {
                continue;
            }
            total_links += file.links.len();

            for checked in file.links.iter().filter(|c| !c.result.valid) {
                broken_links.push(BrokenLink {
                    file: file.file.clone(),
                    line: checked.link.line,
                    column: checked.link.column,
                    target: checked.link.target.clone(),
                    text: checked.link.text.clone(),
                    reason: checked.result.reason.clone().unwrap_or_default(),
                });
            }

            file_details.insert(file.file, file.links);
        }

        Report {
            summary: Summary {
                total_files,
                total_links,
                broken_links: broken_links.len(),
                success: broken_links.is_empty(),
            },
            broken_links,
            file_details,
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
