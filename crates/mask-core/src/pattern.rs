//! Compiled mask patterns and the global match scan.
//!
//! Matches are reported as half-open **character** ranges (not byte ranges), in the same
//! coordinate space hosts use for offset/position conversion.

use crate::error::MaskError;
use regex::{Regex, RegexBuilder};
use ropey::str_utils::byte_to_char_idx;
use std::collections::HashMap;

/// A mask pattern compiled for scanning.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    ignore_case: bool,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile `source`.
    pub fn new(source: &str, ignore_case: bool) -> Result<Self, MaskError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|source_err| MaskError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })?;
        Ok(Self {
            source: source.to_string(),
            ignore_case,
            regex,
        })
    }

    /// The regex source text; this is the base decoration key of the pattern.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the pattern was compiled case-insensitively.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Scan `text` for matches of this pattern.
    pub fn scan(&self, text: &str) -> Vec<TextMatch> {
        scan_matches(&self.regex, text)
    }
}

/// Memoizes compiled patterns by `(source, ignore_case)`.
///
/// Failed compilations are not remembered, so the next render retries them.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<(String, bool), CompiledPattern>,
}

impl PatternCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `source`, compiling it on first use.
    pub fn get_or_compile(
        &mut self,
        source: &str,
        ignore_case: bool,
    ) -> Result<&CompiledPattern, MaskError> {
        let key = (source.to_string(), ignore_case);
        if !self.compiled.contains_key(&key) {
            let pattern = CompiledPattern::new(source, ignore_case)?;
            self.compiled.insert(key.clone(), pattern);
        }
        Ok(&self.compiled[&key])
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Forget every compiled pattern.
    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}

/// One match of a pattern, as a half-open character range plus the literal matched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// The matched substring.
    pub text: String,
}

impl TextMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Scan `text` left to right for non-overlapping matches of `regex`.
///
/// Each search resumes where the previous match ended. The scan stops at the first
/// zero-length match, so patterns that can match the empty string terminate.
pub fn scan_matches(regex: &Regex, text: &str) -> Vec<TextMatch> {
    let mut matches = Vec::new();
    let mut at = 0;
    // Char offset of byte `at`, advanced alongside it.
    let mut at_char = 0;

    while at <= text.len() {
        let Some(m) = regex.find_at(text, at) else {
            break;
        };
        if m.is_empty() {
            break;
        }

        let start = at_char + byte_to_char_idx(&text[at..], m.start() - at);
        let end = start + byte_to_char_idx(m.as_str(), m.len());
        matches.push(TextMatch {
            start,
            end,
            text: m.as_str().to_string(),
        });
        at = m.end();
        at_char = end;
    }

    matches
}
