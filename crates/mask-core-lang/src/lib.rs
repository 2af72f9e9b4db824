#![warn(missing_docs)]
//! `mask-core-lang` - language selection helpers for `mask-core`.
//!
//! This crate intentionally stays lightweight and has no dependencies. It decides which mask
//! definitions apply to a document, given the document's language identifier, and offers a
//! small extension table for hosts that only know a file path.

/// Score returned when a selector names the document language exactly.
pub const EXACT_MATCH_SCORE: u8 = 10;
/// Score returned when a wildcard selector matches any language.
pub const WILDCARD_MATCH_SCORE: u8 = 5;

/// A selector matched against a document's language identifier.
///
/// The textual form is either `*` (any language) or an exact language id such as `rust`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageSelector {
    /// Matches every document.
    Any,
    /// Matches documents whose language id equals this string.
    Exact(String),
}

impl LanguageSelector {
    /// Parse a selector from its textual form.
    ///
    /// Surrounding whitespace is ignored; an empty selector matches nothing.
    pub fn parse(selector: &str) -> Self {
        match selector.trim() {
            "*" => Self::Any,
            other => Self::Exact(other.to_string()),
        }
    }

    /// Returns how well this selector matches `language_id`.
    ///
    /// `0` means no match. An exact match outranks a wildcard match.
    pub fn score(&self, language_id: &str) -> u8 {
        match self {
            Self::Any => WILDCARD_MATCH_SCORE,
            Self::Exact(id) if !id.is_empty() && id == language_id => EXACT_MATCH_SCORE,
            Self::Exact(_) => 0,
        }
    }

    /// Returns `true` if this selector applies to `language_id`.
    pub fn matches(&self, language_id: &str) -> bool {
        self.score(language_id) > 0
    }

    /// The textual form of the selector.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "*",
            Self::Exact(id) => id,
        }
    }
}

impl From<&str> for LanguageSelector {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for LanguageSelector {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl std::fmt::Display for LanguageSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fallback language id for documents without a recognized extension.
pub const PLAIN_TEXT: &str = "plaintext";

const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("c", "c"),
    ("cpp", "cpp"),
    ("cs", "csharp"),
    ("css", "css"),
    ("env", "dotenv"),
    ("go", "go"),
    ("h", "c"),
    ("hpp", "cpp"),
    ("html", "html"),
    ("ini", "ini"),
    ("java", "java"),
    ("js", "javascript"),
    ("json", "json"),
    ("jsx", "javascriptreact"),
    ("lua", "lua"),
    ("md", "markdown"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sh", "shellscript"),
    ("toml", "toml"),
    ("ts", "typescript"),
    ("tsx", "typescriptreact"),
    ("txt", PLAIN_TEXT),
    ("yaml", "yaml"),
    ("yml", "yaml"),
];

/// Look up the language id conventionally associated with a file extension.
///
/// The lookup is case-insensitive and accepts the extension with or without a leading dot.
pub fn language_id_for_extension(extension: &str) -> Option<&'static str> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, id)| *id)
}

/// Guess a language id from a path, falling back to [`PLAIN_TEXT`].
pub fn language_id_for_path(path: &str) -> &'static str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if file_name.starts_with(".env") {
        return "dotenv";
    }
    file_name
        .rsplit_once('.')
        .and_then(|(_, ext)| language_id_for_extension(ext))
        .unwrap_or(PLAIN_TEXT)
}
