//! Heading anchors
//!
//! Slugs follow the common renderer rule: lowercase, drop everything but
//! word characters, whitespace and hyphens, then turn whitespace runs into a
//! single hyphen. Duplicate headings are not suffixed (`-1`, `-2`).
//!
//! Heading text is trimmed first, so `## Foo ` slugs to `foo`, and word
//! characters are Unicode-aware: `## 日本語` keeps its letters where an
//! ASCII-only `\w` rule would leave an empty slug.

use crate::storage::Storage;
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Whether the document at `path` has a heading whose slug is `anchor`.
///
/// Only markdown documents are checked; anything else passes.
pub async fn has_anchor<S: Storage>(storage: &S, path: &Path, anchor: &str) -> io::Result<bool> {
    if path.extension().is_none_or(|ext| ext != "md") {
        return Ok(true);
    }

    let content = storage.read_text(path).await?;
    Ok(heading_slugs(&content).contains(&anchor.to_lowercase()))
}

/// Slugs of every ATX heading (`#` to `######`) in `content`
pub fn heading_slugs(content: &str) -> HashSet<String> {
    content.lines().filter_map(heading_text).map(slugify).collect()
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept = lowered
        .chars()
        .filter(|&c| c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace());

    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;
    for c in kept {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    slug
}
