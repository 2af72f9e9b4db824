//! Per-editor mask controller.
//!
//! A [`MaskController`] owns the decoration handles for one editor. Each [`apply`] turns one
//! compiled pattern plus its [`Mask`] into cursor-aware decorations:
//!
//! - matches are found by a global left-to-right scan of the document text
//! - a match touched by any caret or selection is *revealed* (left undecorated)
//! - the remaining matches are rendered with the pattern's base handle, or with a derived
//!   handle when a per-match replacement maps the literal match text
//!
//! Handles are allocated lazily, reused across renders, and only released by [`clear`] or by
//! eviction of stale per-match handles.
//!
//! [`apply`]: MaskController::apply
//! [`clear`]: MaskController::clear

use crate::config::Mask;
use crate::decorations::{
    DecorationKey, DecorationOptions, DecorationRange, DecorationStyle, DecorationTypeId,
};
use crate::host::{EditorId, MaskHost};
use crate::pattern::{CompiledPattern, TextMatch};
use std::collections::{BTreeMap, BTreeSet};

/// Counts from one [`MaskController::apply`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Matches rendered with a mask.
    pub masked: usize,
    /// Matches left visible because a caret or selection touches them.
    pub revealed: usize,
}

/// Decoration state for one editor.
#[derive(Debug, Default)]
pub struct MaskController {
    editor: Option<EditorId>,
    handles: BTreeMap<DecorationKey, DecorationTypeId>,
}

impl MaskController {
    /// Create a controller bound to `editor`.
    pub fn new(editor: Option<EditorId>) -> Self {
        Self {
            editor,
            handles: BTreeMap::new(),
        }
    }

    /// The editor this controller renders into.
    pub fn editor(&self) -> Option<EditorId> {
        self.editor
    }

    /// Rebind the controller.
    ///
    /// Decorations already rendered into the previous editor are left alone; call
    /// [`MaskController::clear`] first if they should go away.
    pub fn set_editor(&mut self, editor: Option<EditorId>) {
        self.editor = editor;
    }

    /// Number of live decoration handles.
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Keys of the live decoration handles, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &DecorationKey> {
        self.handles.keys()
    }

    /// The handle allocated for `key`, if any.
    pub fn handle(&self, key: &DecorationKey) -> Option<DecorationTypeId> {
        self.handles.get(key).copied()
    }

    /// Remove every decoration and release every handle.
    pub fn clear<H: MaskHost + ?Sized>(&mut self, host: &mut H) {
        for (_, id) in std::mem::take(&mut self.handles) {
            if let Some(editor) = self.editor {
                host.set_decorations(editor, id, Vec::new());
            }
            host.dispose_decoration_type(id);
        }
    }

    /// Decorate every match of `pattern` in the editor's document with `mask`.
    ///
    /// Does nothing when the controller has no editor or the host no longer knows it.
    pub fn apply<H: MaskHost + ?Sized>(
        &mut self,
        host: &mut H,
        pattern: &CompiledPattern,
        mask: &Mask,
    ) -> ApplyStats {
        let mut stats = ApplyStats::default();
        let Some(editor) = self.editor else {
            return stats;
        };
        let Some(text) = host.document_text(editor) else {
            return stats;
        };

        let base_key = DecorationKey::base(pattern.source());
        self.ensure_handle(host, &base_key, || DecorationStyle::for_mask(mask));

        let lead = host.cursor_style().reveal_lead();
        let spans = selection_spans(host, editor);

        let mut ranges: BTreeMap<DecorationKey, Vec<DecorationOptions>> = BTreeMap::new();
        // Derived keys used by masked matches so far in this pass.
        let mut touched: BTreeSet<DecorationKey> = BTreeSet::new();

        for m in pattern.scan(&text) {
            if is_revealed(&spans, &m, lead) {
                stats.revealed += 1;
                self.evict_stale_variants(host, editor, pattern.source(), &touched);
                continue;
            }
            stats.masked += 1;

            let (key, hover) = match mask.match_replacement(&m.text) {
                Some(replacement) => {
                    let key = DecorationKey::derived(pattern.source(), replacement.text.as_str());
                    if !touched.contains(&key) {
                        self.ensure_handle(host, &key, || DecorationStyle::for_match(replacement));
                        touched.insert(key.clone());
                    }
                    (key, replacement.hover.clone())
                }
                None => (base_key.clone(), mask.hover.clone()),
            };

            let range = DecorationRange::new(
                host.position_at(editor, m.start),
                host.position_at(editor, m.end),
            );
            ranges
                .entry(key)
                .or_default()
                .push(DecorationOptions { range, hover });
        }

        for key in &touched {
            if let Some(&id) = self.handles.get(key) {
                host.set_decorations(editor, id, ranges.remove(key).unwrap_or_default());
            }
        }
        if let Some(&id) = self.handles.get(&base_key) {
            host.set_decorations(editor, id, ranges.remove(&base_key).unwrap_or_default());
        }

        tracing::debug!(
            %editor,
            pattern = pattern.source(),
            masked = stats.masked,
            revealed = stats.revealed,
            handles = self.handles.len(),
            "applied mask"
        );
        stats
    }

    fn ensure_handle<H, F>(
        &mut self,
        host: &mut H,
        key: &DecorationKey,
        style: F,
    ) -> DecorationTypeId
    where
        H: MaskHost + ?Sized,
        F: FnOnce() -> DecorationStyle,
    {
        if let Some(&id) = self.handles.get(key) {
            return id;
        }
        let id = host.create_decoration_type(style());
        self.handles.insert(key.clone(), id);
        id
    }

    /// Release derived handles of `pattern` that this pass has not used yet.
    fn evict_stale_variants<H: MaskHost + ?Sized>(
        &mut self,
        host: &mut H,
        editor: EditorId,
        pattern: &str,
        touched: &BTreeSet<DecorationKey>,
    ) {
        let stale: Vec<DecorationKey> = self
            .handles
            .keys()
            .filter(|key| key.is_derived_of(pattern) && !touched.contains(*key))
            .cloned()
            .collect();

        for key in stale {
            if let Some(id) = self.handles.remove(&key) {
                host.set_decorations(editor, id, Vec::new());
                host.dispose_decoration_type(id);
            }
        }
    }
}

/// Normalized `(start, end)` character spans of every caret and selection in `editor`.
fn selection_spans<H: MaskHost + ?Sized>(host: &H, editor: EditorId) -> Vec<(usize, usize)> {
    host.selections(editor)
        .iter()
        .map(|selection| {
            let (min, max) = selection.min_max();
            (host.offset_at(editor, min), host.offset_at(editor, max))
        })
        .collect()
}

/// A match is revealed when some span reaches it: the span ends at or after the match start
/// (shifted `lead` characters earlier) and starts at or before the match end.
fn is_revealed(spans: &[(usize, usize)], m: &TextMatch, lead: usize) -> bool {
    let boundary = m.start.saturating_sub(lead);
    spans
        .iter()
        .any(|&(start, end)| end >= boundary && start <= m.end)
}
