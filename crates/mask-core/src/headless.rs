//! In-memory [`MaskHost`] implementation.
//!
//! [`HeadlessHost`] models a minimal editor host without any UI: documents (text + language id),
//! editors viewing those documents (selections + visibility), a global caret shape, the mask
//! configuration, and the decoration types the engine allocated together with the ranges
//! currently rendered with them.
//!
//! It is used by tests, benchmarks and the preview CLI, and doubles as a reference for hosts
//! embedding the engine. [`HeadlessHost::render_text`] shows what a renderer would draw.

use crate::config::MaskDefinition;
use crate::decorations::{DecorationOptions, DecorationStyle, DecorationTypeId};
use crate::error::MaskError;
use crate::host::{CursorStyle, EditorId, MaskHost};
use crate::line_index::LineIndex;
use crate::text::{Position, Selection};
use std::collections::BTreeMap;

/// Opaque identifier for a document in a [`HeadlessHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct DocumentEntry {
    line_index: LineIndex,
    language_id: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct EditorEntry {
    document: DocumentId,
    selections: Vec<Selection>,
    visible: bool,
}

/// A UI-less editor host.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    documents: BTreeMap<DocumentId, DocumentEntry>,
    editors: BTreeMap<EditorId, EditorEntry>,
    cursor_style: CursorStyle,
    masks: Vec<MaskDefinition>,
    decoration_types: BTreeMap<DecorationTypeId, DecorationStyle>,
    decorations: BTreeMap<(EditorId, DecorationTypeId), Vec<DecorationOptions>>,
    next_id: u64,
    set_decorations_calls: usize,
}

impl HeadlessHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Open a document.
    pub fn open_document(&mut self, text: &str, language_id: impl Into<String>) -> DocumentId {
        let id = DocumentId(self.allocate_id());
        self.documents.insert(
            id,
            DocumentEntry {
                line_index: LineIndex::from_text(text),
                language_id: language_id.into(),
                version: 0,
            },
        );
        id
    }

    /// Open a visible editor on `document` with a caret at the document start.
    pub fn open_editor(&mut self, document: DocumentId) -> Result<EditorId, MaskError> {
        if !self.documents.contains_key(&document) {
            return Err(MaskError::DocumentNotFound(document.get()));
        }
        let id = EditorId(self.allocate_id());
        self.editors.insert(
            id,
            EditorEntry {
                document,
                selections: vec![Selection::caret(Position::default())],
                visible: true,
            },
        );
        Ok(id)
    }

    /// Close an editor, dropping everything rendered into it.
    pub fn close_editor(&mut self, editor: EditorId) -> Result<(), MaskError> {
        self.editors
            .remove(&editor)
            .ok_or(MaskError::EditorNotFound(editor))?;
        self.decorations.retain(|(e, _), _| *e != editor);
        Ok(())
    }

    fn editor_entry_mut(&mut self, editor: EditorId) -> Result<&mut EditorEntry, MaskError> {
        self.editors
            .get_mut(&editor)
            .ok_or(MaskError::EditorNotFound(editor))
    }

    fn document_for(&self, editor: EditorId) -> Option<&DocumentEntry> {
        let entry = self.editors.get(&editor)?;
        self.documents.get(&entry.document)
    }

    /// Make `editor` visible.
    pub fn show_editor(&mut self, editor: EditorId) -> Result<(), MaskError> {
        self.editor_entry_mut(editor)?.visible = true;
        Ok(())
    }

    /// Hide `editor` without closing it.
    pub fn hide_editor(&mut self, editor: EditorId) -> Result<(), MaskError> {
        self.editor_entry_mut(editor)?.visible = false;
        Ok(())
    }

    /// The document shown in `editor`.
    pub fn document_of(&self, editor: EditorId) -> Option<DocumentId> {
        self.editors.get(&editor).map(|e| e.document)
    }

    /// Replace the carets and selections of `editor`.
    pub fn set_selections(
        &mut self,
        editor: EditorId,
        selections: Vec<Selection>,
    ) -> Result<(), MaskError> {
        self.editor_entry_mut(editor)?.selections = selections;
        Ok(())
    }

    /// Place a single caret at `position`.
    pub fn set_cursor(&mut self, editor: EditorId, position: Position) -> Result<(), MaskError> {
        self.set_selections(editor, vec![Selection::caret(position)])
    }

    /// Place a single caret at a character offset.
    pub fn set_cursor_offset(&mut self, editor: EditorId, offset: usize) -> Result<(), MaskError> {
        let position = self.position_at(editor, offset);
        self.editor_entry_mut(editor)?;
        self.set_cursor(editor, position)
    }

    /// Insert `text` at a character offset.
    pub fn insert(
        &mut self,
        document: DocumentId,
        offset: usize,
        text: &str,
    ) -> Result<(), MaskError> {
        let entry = self
            .documents
            .get_mut(&document)
            .ok_or(MaskError::DocumentNotFound(document.get()))?;
        entry.line_index.insert(offset, text);
        entry.version += 1;
        Ok(())
    }

    /// Delete `len` characters starting at a character offset.
    pub fn delete(
        &mut self,
        document: DocumentId,
        offset: usize,
        len: usize,
    ) -> Result<(), MaskError> {
        let entry = self
            .documents
            .get_mut(&document)
            .ok_or(MaskError::DocumentNotFound(document.get()))?;
        entry.line_index.delete(offset, len);
        entry.version += 1;
        Ok(())
    }

    /// The full text of a document.
    pub fn text(&self, document: DocumentId) -> Option<String> {
        self.documents.get(&document).map(|d| d.line_index.get_text())
    }

    /// Edit count of a document.
    pub fn document_version(&self, document: DocumentId) -> Option<u64> {
        self.documents.get(&document).map(|d| d.version)
    }

    /// Set the global caret shape.
    pub fn set_cursor_style(&mut self, style: CursorStyle) {
        self.cursor_style = style;
    }

    /// Replace the mask configuration returned to the engine.
    pub fn set_mask_configuration(&mut self, masks: Vec<MaskDefinition>) {
        self.masks = masks;
    }

    /// Number of decoration types allocated and not yet disposed.
    pub fn live_decoration_types(&self) -> usize {
        self.decoration_types.len()
    }

    /// The style a decoration type was allocated from.
    pub fn decoration_style(&self, decoration_type: DecorationTypeId) -> Option<&DecorationStyle> {
        self.decoration_types.get(&decoration_type)
    }

    /// The ranges currently rendered with `decoration_type` in `editor`.
    pub fn decorations(
        &self,
        editor: EditorId,
        decoration_type: DecorationTypeId,
    ) -> &[DecorationOptions] {
        self.decorations
            .get(&(editor, decoration_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of ranges rendered into `editor`.
    pub fn decoration_count(&self, editor: EditorId) -> usize {
        self.decorations
            .iter()
            .filter(|((e, _), _)| *e == editor)
            .map(|(_, ranges)| ranges.len())
            .sum()
    }

    /// How many times the engine replaced a range list.
    pub fn set_decorations_calls(&self) -> usize {
        self.set_decorations_calls
    }

    /// The text of `editor`'s document as a renderer would draw it.
    ///
    /// Ranges of text-hiding decorations are replaced by their content text; styling-only
    /// decorations leave the text as is. Overlapping hidden ranges keep the earliest one.
    pub fn render_text(&self, editor: EditorId) -> Option<String> {
        let document = self.document_for(editor)?;
        let text = document.line_index.get_text();

        let mut replacements: Vec<(usize, usize, &str)> = Vec::new();
        for ((e, decoration_type), ranges) in &self.decorations {
            if *e != editor {
                continue;
            }
            let Some(style) = self.decoration_types.get(decoration_type) else {
                continue;
            };
            if !style.hides_text {
                continue;
            }
            let content = style.content_text.as_deref().unwrap_or("");
            for options in ranges {
                let start = document.line_index.position_to_char_offset(options.range.start);
                let end = document.line_index.position_to_char_offset(options.range.end);
                replacements.push((start, end, content));
            }
        }
        replacements.sort_by_key(|(start, end, _)| (*start, *end));

        let mut out = String::with_capacity(text.len());
        let mut pending = replacements.into_iter().peekable();
        let mut skip_until = 0;
        for (offset, ch) in text.chars().enumerate() {
            while let Some(&(start, end, content)) = pending.peek() {
                if start > offset {
                    break;
                }
                pending.next();
                if start >= skip_until && start == offset {
                    out.push_str(content);
                    skip_until = end;
                }
            }
            if offset >= skip_until {
                out.push(ch);
            }
        }
        Some(out)
    }
}

impl MaskHost for HeadlessHost {
    fn document_text(&self, editor: EditorId) -> Option<String> {
        self.document_for(editor).map(|d| d.line_index.get_text())
    }

    fn language_id(&self, editor: EditorId) -> Option<String> {
        self.document_for(editor).map(|d| d.language_id.clone())
    }

    fn position_at(&self, editor: EditorId, offset: usize) -> Position {
        self.document_for(editor)
            .map(|d| d.line_index.char_offset_to_position(offset))
            .unwrap_or_default()
    }

    fn offset_at(&self, editor: EditorId, position: Position) -> usize {
        self.document_for(editor)
            .map(|d| d.line_index.position_to_char_offset(position))
            .unwrap_or(0)
    }

    fn selections(&self, editor: EditorId) -> Vec<Selection> {
        self.editors
            .get(&editor)
            .map(|e| e.selections.clone())
            .unwrap_or_default()
    }

    fn visible_editors(&self) -> Vec<EditorId> {
        self.editors
            .iter()
            .filter(|(_, e)| e.visible)
            .map(|(id, _)| *id)
            .collect()
    }

    fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    fn mask_configuration(&self) -> Vec<MaskDefinition> {
        self.masks.clone()
    }

    fn create_decoration_type(&mut self, style: DecorationStyle) -> DecorationTypeId {
        let id = DecorationTypeId(self.allocate_id());
        self.decoration_types.insert(id, style);
        id
    }

    fn set_decorations(
        &mut self,
        editor: EditorId,
        decoration_type: DecorationTypeId,
        decorations: Vec<DecorationOptions>,
    ) {
        self.set_decorations_calls += 1;
        let known_type = self.decoration_types.contains_key(&decoration_type);
        if !known_type || !self.editors.contains_key(&editor) {
            return;
        }
        if decorations.is_empty() {
            self.decorations.remove(&(editor, decoration_type));
        } else {
            self.decorations.insert((editor, decoration_type), decorations);
        }
    }

    fn dispose_decoration_type(&mut self, decoration_type: DecorationTypeId) {
        self.decoration_types.remove(&decoration_type);
        self.decorations.retain(|(_, t), _| *t != decoration_type);
    }
}
