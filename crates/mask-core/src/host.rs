//! The contract between the masking engine and the editor host.
//!
//! The engine never owns editors or documents. It looks them up through [`MaskHost`] by
//! [`EditorId`] every time it renders, so an editor that closed between scheduling and running
//! a render simply yields nothing.

use crate::config::MaskDefinition;
use crate::decorations::{DecorationOptions, DecorationStyle, DecorationTypeId};
use crate::error::MaskError;
use crate::text::{Position, Selection};
use serde::Deserialize;
use std::str::FromStr;

/// Opaque identifier for an editor (a view onto a document) in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(pub u64);

impl EditorId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EditorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "editor#{}", self.0)
    }
}

/// How the host draws carets.
///
/// Block and underline carets cover the character after the logical caret position, so they
/// reach a mask one character earlier than a line caret does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    /// A vertical bar between characters.
    #[default]
    Line,
    /// A thin vertical bar between characters.
    LineThin,
    /// A filled block over the next character.
    Block,
    /// An outlined block over the next character.
    BlockOutline,
    /// An underline beneath the next character.
    Underline,
    /// A thin underline beneath the next character.
    UnderlineThin,
}

impl CursorStyle {
    /// How many characters before a match start a caret still reveals the match.
    pub fn reveal_lead(self) -> usize {
        match self {
            Self::Line | Self::LineThin => 0,
            Self::Block | Self::BlockOutline | Self::Underline | Self::UnderlineThin => 1,
        }
    }

    /// The host's textual name for this style.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::LineThin => "line-thin",
            Self::Block => "block",
            Self::BlockOutline => "block-outline",
            Self::Underline => "underline",
            Self::UnderlineThin => "underline-thin",
        }
    }
}

impl FromStr for CursorStyle {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "line" => Ok(Self::Line),
            "line-thin" => Ok(Self::LineThin),
            "block" => Ok(Self::Block),
            "block-outline" => Ok(Self::BlockOutline),
            "underline" => Ok(Self::Underline),
            "underline-thin" => Ok(Self::UnderlineThin),
            other => Err(MaskError::UnknownCursorStyle(other.to_string())),
        }
    }
}

/// Everything the engine needs from the editor host.
///
/// Offsets are character offsets into the document text. Lookups for an editor the host no
/// longer knows return `None` (or an empty list) rather than failing.
pub trait MaskHost {
    /// The full text of the document shown in `editor`.
    fn document_text(&self, editor: EditorId) -> Option<String>;

    /// The language id of the document shown in `editor`.
    fn language_id(&self, editor: EditorId) -> Option<String>;

    /// Convert a character offset into a position in `editor`'s document.
    fn position_at(&self, editor: EditorId, offset: usize) -> Position;

    /// Convert a position into a character offset in `editor`'s document.
    fn offset_at(&self, editor: EditorId, position: Position) -> usize;

    /// The carets and selections of `editor`.
    fn selections(&self, editor: EditorId) -> Vec<Selection>;

    /// Editors currently visible, in display order.
    fn visible_editors(&self) -> Vec<EditorId>;

    /// The global caret shape preference.
    fn cursor_style(&self) -> CursorStyle;

    /// The masks currently configured under the engine's namespace.
    fn mask_configuration(&self) -> Vec<MaskDefinition>;

    /// Allocate a decoration type.
    fn create_decoration_type(&mut self, style: DecorationStyle) -> DecorationTypeId;

    /// Replace the ranges rendered with `decoration_type` in `editor`.
    fn set_decorations(
        &mut self,
        editor: EditorId,
        decoration_type: DecorationTypeId,
        decorations: Vec<DecorationOptions>,
    );

    /// Release a decoration type and everything rendered with it.
    fn dispose_decoration_type(&mut self, decoration_type: DecorationTypeId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_style_parse_and_lead() {
        for style in [
            CursorStyle::Line,
            CursorStyle::LineThin,
            CursorStyle::Block,
            CursorStyle::BlockOutline,
            CursorStyle::Underline,
            CursorStyle::UnderlineThin,
        ] {
            assert_eq!(style.as_str().parse::<CursorStyle>().unwrap(), style);
        }

        assert_eq!(CursorStyle::Line.reveal_lead(), 0);
        assert_eq!(CursorStyle::LineThin.reveal_lead(), 0);
        assert_eq!(CursorStyle::Block.reveal_lead(), 1);
        assert_eq!(CursorStyle::UnderlineThin.reveal_lead(), 1);
        assert!(matches!(
            "beam".parse::<CursorStyle>(),
            Err(MaskError::UnknownCursorStyle(_))
        ));
    }

    #[test]
    fn test_cursor_style_deserialize() {
        let style: CursorStyle = serde_json::from_str("\"block-outline\"").unwrap();
        assert_eq!(style, CursorStyle::BlockOutline);
    }
}
