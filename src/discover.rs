//! Document discovery: glob include pattern plus ignore patterns

use crate::error::Error;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Default ignore patterns, relative to the document root
pub const DEFAULT_IGNORE: &[&str] = &[
    "node_modules/**",
    "**/node_modules/**",
    "output/**",
    "**/output/**",
];

/// Wildcards never match a leading `.`, so hidden directories such as
/// `.github` are only searched when the pattern names them.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A document to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated
    pub relative: String,
}

/// Files under `root` matching `pattern` and none of `ignore`, sorted by
/// relative path.
pub fn discover_documents(root: &Path, pattern: &str, ignore: &[String]) -> Result<Vec<Document>, Error> {
    let ignore = ignore
        .iter()
        .map(|p| compile(p))
        .collect::<Result<Vec<_>, _>>()?;

    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        pattern.trim_start_matches("./")
    );
    let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry?;
        if !path.is_file() {
            continue;
        }

        let relative = relative_name(root, &path);
        if ignore.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS)) {
            continue;
        }

        documents.push(Document { path, relative });
    }

    documents.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(documents)
}

/// `/`-separated path of `path` relative to `root`
pub fn relative_name(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn compile(pattern: &str) -> Result<Pattern, Error> {
    Pattern::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn default_ignore() -> Vec<String> {
        DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# doc\n").unwrap();
    }

    #[test]
    fn test_discover_with_default_ignores() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for rel in [
            "README.md",
            "docs/guide/intro.md",
            "docs/api.md",
            "node_modules/pkg/README.md",
            "web/node_modules/pkg/README.md",
            "output/report.md",
            "docs/output/gen.md",
            "notes.txt",
        ] {
            touch(root, rel);
        }

        let docs = discover_documents(root, "**/*.md", &default_ignore()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.relative.as_str()).collect();
        assert_eq!(names, vec!["README.md", "docs/api.md", "docs/guide/intro.md"]);
        assert_eq!(docs[0].path, root.join("README.md"));
    }

    #[test]
    fn test_discover_custom_pattern() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "README.md");
        touch(root, "docs/a.md");
        touch(root, "docs/deep/b.md");

        let docs = discover_documents(root, "docs/*.md", &[]).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.relative.as_str()).collect();
        assert_eq!(names, vec!["docs/a.md"]);
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, ".github/PULL_REQUEST_TEMPLATE.md");
        touch(root, "docs/.drafts/wip.md");
        touch(root, "a.md");

        let docs = discover_documents(root, "**/*.md", &[]).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.relative.as_str()).collect();
        assert_eq!(names, vec!["a.md"]);

        let docs = discover_documents(root, ".github/*.md", &[]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].relative, ".github/PULL_REQUEST_TEMPLATE.md");
    }

    #[test]
    fn test_directories_are_not_documents() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("weird.md")).unwrap();
        touch(root, "real.md");

        let docs = discover_documents(root, "**/*.md", &[]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].relative, "real.md");
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let dir = tempdir().unwrap();
        let err = discover_documents(dir.path(), "**/*.md", &["a/***/b".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
        assert!(err.to_string().contains("a/***/b"));
    }

    #[test]
    fn test_relative_name() {
        assert_eq!(
            relative_name(Path::new("/r"), Path::new("/r/docs/a.md")),
            "docs/a.md"
        );
        assert_eq!(relative_name(Path::new("/other"), Path::new("/r/a.md")), "/r/a.md");
    }
}
