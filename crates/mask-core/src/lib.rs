#![warn(missing_docs)]
//! Mask Core - Cursor-Aware Regex Masking Engine
//!
//! # Overview
//!
//! `mask-core` renders inline visual substitutions ("masks") over spans of text in an open
//! document. A configured regular expression finds matches, and each match is decorated to
//! appear as replacement text (or is restyled) without altering the underlying content. When a
//! caret or selection touches a match, the mask is suppressed and the real text is revealed.
//!
//! The engine is headless: it talks to the editor through the [`MaskHost`] trait, which
//! provides document text, selections and offset/position conversion, and accepts
//! "set decorations" commands.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Host events (editors, saves, selections)   │  ← MaskHost / HostEvent
//! ├─────────────────────────────────────────────┤
//! │  MaskRegistry (dispatch + debounce)         │  ← one per process
//! ├─────────────────────────────────────────────┤
//! │  MaskController (handles + reveal rule)     │  ← one per editor
//! ├─────────────────────────────────────────────┤
//! │  CompiledPattern (global scan)              │  ← regex matching
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use mask_core::{HeadlessHost, MaskDefinition, MaskRegistry, MaskSettings, PatternDefinition};
//!
//! let mut host = HeadlessHost::new();
//! host.set_mask_configuration(vec![MaskDefinition::new(
//!     "*",
//!     vec![PatternDefinition::replace_with(r"secret\d+", "••••••")],
//! )]);
//!
//! let doc = host.open_document("token = secret123\n", "plaintext");
//! let editor = host.open_editor(doc).unwrap();
//!
//! let _registry = MaskRegistry::activate(&mut host, MaskSettings::default());
//! assert_eq!(host.render_text(editor).unwrap(), "token = ••••••\n");
//! ```
//!
//! # Module Description
//!
//! - [`config`] - Mask configuration model (serde)
//! - [`pattern`] - Compiled patterns and the global match scan
//! - [`decorations`] - Decoration keys, styles and ranges
//! - [`host`] - The host contract
//! - [`controller`] - Per-editor mask controller
//! - [`dispatch`] - Controller registry, lifecycle events, extension API
//! - [`debounce`] - Last-call-wins debouncing
//! - [`headless`] - In-memory host

pub mod config;
pub mod controller;
pub mod debounce;
pub mod decorations;
pub mod dispatch;
mod error;
pub mod headless;
pub mod host;
pub mod line_index;
pub mod pattern;
pub mod text;

pub use config::{
    AdditionalMasksMode, CONFIG_SECTION, Mask, MaskConfiguration, MaskDefinition, MaskSettings,
    MatchReplacement, PatternDefinition, Replacement, StyleSpec,
};
pub use controller::{ApplyStats, MaskController};
pub use debounce::{DebounceToken, Debouncer};
pub use decorations::{
    DecorationKey, DecorationOptions, DecorationRange, DecorationStyle, DecorationTypeId,
};
pub use dispatch::{HostEvent, MaskRegistry};
pub use error::MaskError;
pub use headless::{DocumentId, HeadlessHost};
pub use host::{CursorStyle, EditorId, MaskHost};
pub use line_index::LineIndex;
pub use mask_core_lang::LanguageSelector;
pub use pattern::{CompiledPattern, PatternCache, TextMatch};
pub use text::{Position, Selection, SelectionDirection};
