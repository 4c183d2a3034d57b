//! Link extraction from markdown text
//!
//! Fenced code blocks are skipped and inline code spans are blanked out
//! before the link patterns run, so code that merely looks like a link
//! (`dict[key](arg)`) is never reported.

use crate::schema::{LinkForm, LinkOccurrence};
use regex::Regex;
use std::collections::VecDeque;
use std::str::Lines;

/// Character used to blank out inline code spans
const FILLER: char = ' ';

/// A link regex tagged with the construct it matches.
///
/// Every pattern names its captures `label` and `target`.
struct LinkPattern {
    form: LinkForm,
    regex: Regex,
}

impl LinkPattern {
    fn new(form: LinkForm, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            form,
            regex: Regex::new(pattern)?,
        })
    }
}

/// Extracts link occurrences from documents
pub struct Extractor {
    patterns: Vec<LinkPattern>,
}

impl Extractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: vec![
                LinkPattern::new(
                    LinkForm::Inline,
                    r"\[(?P<label>[^\]]+)\]\((?P<target>[^)]+)\)",
                )?,
                LinkPattern::new(
                    LinkForm::Reference,
                    r"\[(?P<label>[^\]]+)\]\[(?P<target>[^\]]+)\]",
                )?,
                LinkPattern::new(
                    LinkForm::Definition,
                    r"^\s*\[(?P<label>[^\]]+)\]:\s*(?P<target>.+)$",
                )?,
            ],
        })
    }

    /// Lazily extract every link in `text`, in line order.
    ///
    /// Within a line, occurrences are grouped by pattern (inline, reference,
    /// definition) and no deduplication happens across patterns.
    pub fn extract<'a>(&'a self, text: &'a str) -> Occurrences<'a> {
        Occurrences {
            patterns: &self.patterns,
            lines: text.lines(),
            line_no: 0,
            fence: FenceState::default(),
            pending: VecDeque::new(),
        }
    }
}

/// Iterator returned by [`Extractor::extract`]
pub struct Occurrences<'a> {
    patterns: &'a [LinkPattern],
    lines: Lines<'a>,
    line_no: usize,
    fence: FenceState,
    pending: VecDeque<LinkOccurrence>,
}

impl Iterator for Occurrences<'_> {
    type Item = LinkOccurrence;

    fn next(&mut self) -> Option<LinkOccurrence> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }

            let line = self.lines.next()?;
            self.line_no += 1;

            if self.fence.skips(line) {
                continue;
            }

            let masked = mask_code_spans(line);
            scan_line(self.patterns, self.line_no, &masked, &mut self.pending);
        }
    }
}

fn scan_line(
    patterns: &[LinkPattern],
    line_no: usize,
    masked: &str,
    out: &mut VecDeque<LinkOccurrence>,
) {
    for pattern in patterns {
        for cap in pattern.regex.captures_iter(masked) {
            let (Some(whole), Some(label), Some(target)) =
                (cap.get(0), cap.name("label"), cap.name("target"))
            else {
                continue;
            };

            let target = target.as_str().trim();
            // Pure same-document anchors are not validated
            if target.is_empty() || target.starts_with('#') {
                continue;
            }

            out.push_back(LinkOccurrence {
                line: line_no,
                column: masked[..whole.start()].chars().count() + 1,
                text: label.as_str().trim().to_string(),
                target: target.to_string(),
                raw: whole.as_str().to_string(),
                form: pattern.form,
            });
        }
    }
}

/// Fenced code block tracking for one extraction pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FenceState {
    /// Marker character and run length that opened the current fence
    open: Option<(char, usize)>,
}

impl FenceState {
    #[cfg(test)]
    fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line; returns true when the line must not be scanned
    /// (a fence marker, or anything inside a fence).
    pub fn skips(&mut self, line: &str) -> bool {
        match (self.open, fence_marker(line)) {
            (None, Some(marker)) => {
                self.open = Some(marker);
                true
            }
            (Some((ch, len)), Some((close_ch, close_len))) if ch == close_ch && close_len >= len => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

/// Leading run of three or more backticks or tildes, after optional indent
pub fn fence_marker(line: &str) -> Option<(char, usize)> {
    let rest = line.trim_start();
    let ch = rest.chars().next().filter(|&c| matches!(c, '`' | '~'))?;
    let len = rest.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Blank out inline code spans, keeping the character count of the line.
///
/// A span opens with a run of N backticks and closes at the next run of
/// exactly N backticks. An opening run with no closer is left as text.
pub fn mask_code_spans(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = chars.clone();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '`' {
            i += 1;
            continue;
        }

        let open = run_length(&chars, i);
        let mut j = i + open;
        let mut close_end = None;

        while j < chars.len() {
            if chars[j] != '`' {
                j += 1;
                continue;
            }
            let run = run_length(&chars, j);
            if run == open {
                close_end = Some(j + run);
                break;
            }
            j += run;
        }

        match close_end {
            Some(end) => {
                out[i..end].fill(FILLER);
                i = end;
            }
            None => i += open,
        }
    }

    out.into_iter().collect()
}

fn run_length(chars: &[char], start: usize) -> usize {
    chars[start..].iter().take_while(|&&c| c == '`').count()
}
