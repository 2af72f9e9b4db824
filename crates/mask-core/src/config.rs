//! Mask configuration model.
//!
//! Mask definitions are read from JSON under the [`CONFIG_SECTION`] namespace:
//!
//! ```json
//! {
//!   "symbolMasks.masks": [
//!     {
//!       "language": "*",
//!       "patterns": [
//!         { "pattern": "secret\\d+", "replace": "••••••", "hover": "hidden secret" },
//!         {
//!           "pattern": "\\b(foo|bar)\\b",
//!           "replace": { "foo": { "text": "F", "color": "red" }, "bar": { "text": "B" } }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The un-namespaced form `{ "masks": [...] }` and a bare array of definitions are accepted too.

use crate::error::MaskError;
use mask_core_lang::LanguageSelector;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Configuration namespace owned by the masking engine.
pub const CONFIG_SECTION: &str = "symbolMasks";

/// Default quiet period before a selection-triggered render runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Returns `true` if a change to configuration `section` affects the mask configuration.
///
/// A change affects the engine when `section` is the namespace itself, a key nested beneath
/// it (`symbolMasks.masks`), or a parent of it (the empty root section).
pub fn affects_mask_configuration(section: &str) -> bool {
    if section.is_empty() || section == CONFIG_SECTION {
        return true;
    }
    section
        .strip_prefix(CONFIG_SECTION)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Free-form presentation attributes, passed through verbatim to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    /// CSS `background-color`.
    #[serde(default)]
    pub background_color: Option<String>,
    /// CSS `border`.
    #[serde(default)]
    pub border: Option<String>,
    /// CSS `border-color`.
    #[serde(default)]
    pub border_color: Option<String>,
    /// CSS `color`.
    #[serde(default)]
    pub color: Option<String>,
    /// CSS `font-style`.
    #[serde(default)]
    pub font_style: Option<String>,
    /// CSS `font-weight`.
    #[serde(default)]
    pub font_weight: Option<String>,
    /// Extra CSS injected into the mask.
    #[serde(default)]
    pub css: Option<String>,
}

/// Replacement for one literal matched substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MatchReplacement {
    /// Text rendered in place of the match.
    pub text: String,
    /// Hover text for this literal.
    #[serde(default)]
    pub hover: Option<String>,
    /// Style for this literal.
    #[serde(flatten)]
    pub style: StyleSpec,
}

/// What a match is rendered as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Replacement {
    /// Every match renders as the same text.
    Text(String),
    /// Each literal match looks up its own replacement; literals not in the map are only styled.
    PerMatch(BTreeMap<String, MatchReplacement>),
}

impl Replacement {
    /// The uniform replacement text, if any. An empty string is no replacement.
    pub fn uniform_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// The per-match replacement for `literal`, if the map has one with non-empty text.
    pub fn for_match(&self, literal: &str) -> Option<&MatchReplacement> {
        match self {
            Self::PerMatch(map) => map.get(literal).filter(|r| !r.text.is_empty()),
            Self::Text(_) => None,
        }
    }
}

/// One configured pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDefinition {
    /// Regex source.
    pub pattern: String,
    /// Compile the pattern case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
    /// Replacement text or per-match replacement map.
    #[serde(default)]
    pub replace: Option<Replacement>,
    /// Hover text for masked matches.
    #[serde(default)]
    pub hover: Option<String>,
    /// Style for masked matches.
    #[serde(default)]
    pub style: Option<StyleSpec>,
}

impl PatternDefinition {
    /// Create a pattern with a uniform replacement text.
    pub fn replace_with(pattern: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ignore_case: false,
            replace: Some(Replacement::Text(text.into())),
            hover: None,
            style: None,
        }
    }

    /// The runtime mask this pattern renders with.
    pub fn to_mask(&self) -> Mask {
        Mask {
            replacement: self.replace.clone(),
            hover: self.hover.clone(),
            style: self.style.clone().unwrap_or_default(),
        }
    }
}

/// A language selector plus the patterns that apply to matching documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaskDefinition {
    /// Which documents this definition applies to.
    #[serde(deserialize_with = "deserialize_selector")]
    pub language: LanguageSelector,
    /// Patterns applied to matching documents.
    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,
}

impl MaskDefinition {
    /// Create a definition for `language`.
    pub fn new(language: impl Into<LanguageSelector>, patterns: Vec<PatternDefinition>) -> Self {
        Self {
            language: language.into(),
            patterns,
        }
    }

    /// Returns `true` if this definition applies to documents of `language_id`.
    pub fn applies_to(&self, language_id: &str) -> bool {
        self.language.matches(language_id)
    }
}

fn deserialize_selector<'de, D>(deserializer: D) -> Result<LanguageSelector, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(LanguageSelector::parse(&raw))
}

/// The runtime form of a pattern's presentation, handed to the controller on every apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mask {
    /// Replacement text or per-match map; `None` means styling only.
    pub replacement: Option<Replacement>,
    /// Hover text for matches rendered with the base style.
    pub hover: Option<String>,
    /// Base style.
    pub style: StyleSpec,
}

impl Mask {
    /// A mask that renders every match as `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            replacement: Some(Replacement::Text(text.into())),
            ..Self::default()
        }
    }

    /// A mask that only restyles matches.
    pub fn styled(style: StyleSpec) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// A mask with a per-literal replacement map.
    pub fn per_match<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, MatchReplacement)>,
        K: Into<String>,
    {
        Self {
            replacement: Some(Replacement::PerMatch(
                entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            )),
            ..Self::default()
        }
    }

    /// Set the hover text.
    pub fn with_hover(mut self, hover: impl Into<String>) -> Self {
        self.hover = Some(hover.into());
        self
    }

    /// Set the base style.
    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }

    /// The uniform replacement text, if any.
    pub fn uniform_text(&self) -> Option<&str> {
        self.replacement.as_ref().and_then(Replacement::uniform_text)
    }

    /// The per-match replacement for `literal`, if any.
    pub fn match_replacement(&self, literal: &str) -> Option<&MatchReplacement> {
        self.replacement.as_ref()?.for_match(literal)
    }
}

/// The full set of configured masks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MaskConfiguration {
    /// Mask definitions in configuration order.
    #[serde(default, alias = "symbolMasks.masks")]
    pub masks: Vec<MaskDefinition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfiguration {
    Bare(Vec<MaskDefinition>),
    Wrapped(MaskConfiguration),
}

impl MaskConfiguration {
    /// Parse a configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, MaskError> {
        let raw: RawConfiguration = serde_json::from_str(json)?;
        Ok(match raw {
            RawConfiguration::Bare(masks) => Self { masks },
            RawConfiguration::Wrapped(config) => config,
        })
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MaskError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// How masks supplied through
/// [`MaskRegistry::add_additional_masks`](crate::MaskRegistry::add_additional_masks) combine
/// with those supplied earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdditionalMasksMode {
    /// Each call appends to the previously supplied masks.
    #[default]
    Accumulate,
    /// Each call replaces the previously supplied masks.
    Replace,
}

/// Engine settings that are not part of the mask list itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskSettings {
    /// Quiet period for selection-triggered renders.
    pub debounce: Duration,
    /// How additional masks combine across calls.
    pub additional_masks: AdditionalMasksMode,
}

impl Default for MaskSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            additional_masks: AdditionalMasksMode::default(),
        }
    }
}
