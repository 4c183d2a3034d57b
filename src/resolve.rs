//! Link target resolution
//!
//! Maps a link target onto the filesystem paths it could mean and picks the
//! first one that exists. Root-relative targets (`/guide/intro`) are tried
//! against both the document root and its documentation subdirectory, since
//! site generators often publish that subdirectory as the site root.

use crate::anchors::has_anchor;
use crate::schema::ResolutionResult;
use crate::storage::Storage;
use std::path::{Path, PathBuf};

/// Resolves link targets found in documents under one root
pub struct Resolver<'a, S> {
    storage: &'a S,
    root: PathBuf,
    docs_root: PathBuf,
}

impl<'a, S: Storage> Resolver<'a, S> {
    /// `docs_dir` names the documentation subdirectory of `root`.
    pub fn new(storage: &'a S, root: impl Into<PathBuf>, docs_dir: &str) -> Self {
        let root = root.into();
        let docs_root = root.join(docs_dir);
        Self {
            storage,
            root,
            docs_root,
        }
    }

    /// Resolve `target` as written in the document at `source`.
    ///
    /// Never fails: storage errors come back as `error`-kind results.
    pub async fn resolve(&self, target: &str, source: &Path) -> ResolutionResult {
        if target.starts_with("http://") || target.starts_with("https://") {
            return ResolutionResult::external();
        }
        if target.starts_with("mailto:") {
            return ResolutionResult::email();
        }

        let (url_path, anchor) = split_anchor(target);

        let found = match self.probe(url_path, source).await {
            Ok(Some(path)) => path,
            Ok(None) => return ResolutionResult::file_not_found(),
            Err(e) => return ResolutionResult::storage_error(&e),
        };

        if let Some(anchor) = anchor {
            match has_anchor(self.storage, &found, anchor).await {
                Ok(true) => {}
                Ok(false) => return ResolutionResult::anchor_not_found(anchor),
                Err(e) => return ResolutionResult::storage_error(&e),
            }
        }

        ResolutionResult::found(found)
    }

    /// Base directories for `url_path`, highest priority first
    pub fn candidate_roots(&self, url_path: &str, source: &Path) -> Vec<PathBuf> {
        if url_path.starts_with('/') {
            if source.starts_with(&self.docs_root) {
                vec![self.docs_root.clone(), self.root.clone()]
            } else {
                vec![self.root.clone(), self.docs_root.clone()]
            }
        } else {
            let dir = source.parent().unwrap_or(self.root.as_path());
            vec![dir.to_path_buf()]
        }
    }

    /// First existing candidate, walking roots in priority order
    async fn probe(&self, url_path: &str, source: &Path) -> std::io::Result<Option<PathBuf>> {
        let mut probed: Vec<PathBuf> = Vec::new();

        for base in self.candidate_roots(url_path, source) {
            for candidate in probe_candidates(&Joined::new(&base, url_path)) {
                if probed.iter().any(|p| p.as_os_str() == candidate.as_os_str()) {
                    continue;
                }
                if self.storage.exists(&candidate).await? {
                    return Ok(Some(candidate));
                }
                probed.push(candidate);
            }
        }

        Ok(None)
    }
}

/// Split `target` at its first `#`. An empty fragment counts as none.
pub fn split_anchor(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((path, anchor)) if !anchor.is_empty() => (path, Some(anchor)),
        Some((path, _)) => (path, None),
        None => (target, None),
    }
}

/// A url path joined onto one base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// As written, trailing slash kept
    pub exact: PathBuf,
    /// Trailing slashes removed
    pub trimmed: PathBuf,
}

impl Joined {
    /// Join lexically: `.` is dropped and `..` pops a component, without
    /// touching storage.
    pub fn new(base: &Path, url_path: &str) -> Self {
        let mut trimmed = base.to_path_buf();
        for part in url_path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    trimmed.pop();
                }
                other => trimmed.push(other),
            }
        }

        let exact = if url_path.ends_with('/') {
            append(&trimmed, "/")
        } else {
            trimmed.clone()
        };

        Self { exact, trimmed }
    }
}

/// Paths to probe for one joined target, in priority order:
/// exact, trimmed, `.md` appended (extensionless only), `index.md`,
/// `index.html`.
pub fn probe_candidates(joined: &Joined) -> Vec<PathBuf> {
    let Joined { exact, trimmed } = joined;
    let mut candidates = vec![exact.clone()];

    if trimmed.as_os_str() != exact.as_os_str() {
        candidates.push(trimmed.clone());
    }
    if trimmed.extension().is_none() {
        candidates.push(append(trimmed, ".md"));
    }
    candidates.push(trimmed.join("index.md"));
    candidates.push(trimmed.join("index.html"));

    candidates
}

fn append(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
