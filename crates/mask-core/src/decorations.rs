//! Renderer-facing decoration types.
//!
//! A decoration type is an opaque, host-owned handle describing one visual style. The
//! controller allocates one handle per [`DecorationKey`] and then repeatedly replaces the list
//! of ranges rendered with it, without modifying the document text.

use crate::config::{Mask, MatchReplacement, StyleSpec};
use crate::text::Position;

/// Separator between the pattern source and the replacement text in a derived key's text form.
pub const DECORATION_KEY_SEPARATOR: &str = "@@@";

/// Identifies one decoration handle owned by a controller.
///
/// The base key of a pattern is its regex source. A derived key additionally carries the
/// replacement text of a per-match replacement, so every distinct replacement text gets its
/// own handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationKey {
    /// Regex source of the pattern.
    pub pattern: String,
    /// Replacement text for derived keys; `None` for the base key.
    pub variant: Option<String>,
}

impl DecorationKey {
    /// The base key for `pattern`.
    pub fn base(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            variant: None,
        }
    }

    /// The derived key for a per-match replacement text.
    pub fn derived(pattern: impl Into<String>, replacement_text: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            variant: Some(replacement_text.into()),
        }
    }

    /// Returns `true` for a derived key.
    pub fn is_derived(&self) -> bool {
        self.variant.is_some()
    }

    /// Returns `true` if this is a derived key of `pattern`.
    pub fn is_derived_of(&self, pattern: &str) -> bool {
        self.is_derived() && self.pattern == pattern
    }
}

impl std::fmt::Display for DecorationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}{}{}", self.pattern, DECORATION_KEY_SEPARATOR, variant),
            None => f.write_str(&self.pattern),
        }
    }
}

/// Opaque host handle for an allocated decoration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationTypeId(pub u64);

impl DecorationTypeId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The style descriptor a decoration type is allocated from.
///
/// With `hides_text` set, the real characters are rendered zero-width and `content_text` is
/// drawn in a "before" pseudo-element using `style`. Otherwise the real text stays visible and
/// only `style` applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationStyle {
    /// Hide the underlying characters.
    pub hides_text: bool,
    /// Text drawn in place of the hidden characters.
    pub content_text: Option<String>,
    /// Presentation attributes, passed through verbatim.
    pub style: StyleSpec,
}

impl DecorationStyle {
    /// The style of a pattern's base handle.
    ///
    /// Only a uniform replacement text hides the match; a per-match map leaves unmapped
    /// literals visible and styled.
    pub fn for_mask(mask: &Mask) -> Self {
        let content_text = mask.uniform_text().map(str::to_string);
        Self {
            hides_text: content_text.is_some(),
            content_text,
            style: mask.style.clone(),
        }
    }

    /// The style of a derived handle.
    pub fn for_match(replacement: &MatchReplacement) -> Self {
        Self {
            hides_text: true,
            content_text: Some(replacement.text.clone()),
            style: replacement.style.clone(),
        }
    }
}

/// A decorated range, expressed in logical positions (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationRange {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl DecorationRange {
    /// Create a new decoration range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One range rendered with a decoration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationOptions {
    /// Anchor range.
    pub range: DecorationRange,
    /// Optional hover text.
    pub hover: Option<String>,
}
