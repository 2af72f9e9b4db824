//! Controller registry and render dispatch.
//!
//! [`MaskRegistry`] is the single context object for a host process. It owns:
//!
//! - the configured masks and any masks supplied by other integrations
//! - one [`MaskController`] per editor it has seen and the host has not closed
//! - the compiled-pattern cache
//! - the debouncer for selection- and save-triggered renders
//!
//! Hosts feed lifecycle events into [`MaskRegistry::handle_event`] and call
//! [`MaskRegistry::poll`] when [`MaskRegistry::next_deadline`] passes.

use crate::config::{
    AdditionalMasksMode, MaskDefinition, MaskSettings, affects_mask_configuration,
};
use crate::controller::{ApplyStats, MaskController};
use crate::debounce::Debouncer;
use crate::host::{EditorId, MaskHost};
use crate::pattern::PatternCache;
use std::collections::BTreeMap;
use std::time::Instant;

/// Lifecycle events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Editors were shown or hidden.
    VisibleEditorsChanged,
    /// The document shown in `editor` was saved.
    DocumentSaved {
        /// Editor showing the saved document.
        editor: EditorId,
    },
    /// Carets or selections of `editor` moved.
    SelectionChanged {
        /// Editor whose selections changed.
        editor: EditorId,
    },
    /// Configuration sections changed.
    ConfigurationChanged {
        /// Dotted names of the changed sections.
        sections: Vec<String>,
    },
}

/// Owns every controller and decides when to render.
#[derive(Debug)]
pub struct MaskRegistry {
    settings: MaskSettings,
    configured: Vec<MaskDefinition>,
    additional: Vec<MaskDefinition>,
    patterns: PatternCache,
    controllers: BTreeMap<EditorId, MaskController>,
    debouncer: Debouncer<EditorId>,
}

impl MaskRegistry {
    /// Create a registry with `settings` and an initial mask configuration.
    pub fn new(settings: MaskSettings, configured: Vec<MaskDefinition>) -> Self {
        Self {
            settings,
            configured,
            additional: Vec::new(),
            patterns: PatternCache::new(),
            controllers: BTreeMap::new(),
            debouncer: Debouncer::new(settings.debounce),
        }
    }

    /// Create a registry from the host's current configuration and render visible editors.
    pub fn activate<H: MaskHost + ?Sized>(host: &mut H, settings: MaskSettings) -> Self {
        let mut registry = Self::new(settings, host.mask_configuration());
        registry.render_visible(host);
        registry
    }

    /// Engine settings.
    pub fn settings(&self) -> MaskSettings {
        self.settings
    }

    /// The configured masks.
    pub fn configured_masks(&self) -> &[MaskDefinition] {
        &self.configured
    }

    /// Masks supplied through [`MaskRegistry::add_additional_masks`].
    pub fn additional_masks(&self) -> &[MaskDefinition] {
        &self.additional
    }

    /// The controller for `editor`, if one was created.
    pub fn controller(&self, editor: EditorId) -> Option<&MaskController> {
        self.controllers.get(&editor)
    }

    /// Number of controllers.
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// When [`MaskRegistry::poll`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Returns `true` if a debounced render is pending for `editor`.
    pub fn is_render_pending(&self, editor: EditorId) -> bool {
        self.debouncer.is_pending(&editor)
    }

    /// React to a host lifecycle event.
    pub fn handle_event<H: MaskHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: HostEvent,
        now: Instant,
    ) {
        tracing::trace!(?event, "mask host event");
        match event {
            HostEvent::VisibleEditorsChanged => self.render_visible(host),
            HostEvent::DocumentSaved { editor } | HostEvent::SelectionChanged { editor } => {
                self.debouncer.schedule(editor, now);
            }
            HostEvent::ConfigurationChanged { sections } => {
                if sections.iter().any(|s| affects_mask_configuration(s)) {
                    self.reload(host);
                }
            }
        }
    }

    /// Run every debounced render whose quiet period has elapsed. Returns how many ran.
    pub fn poll<H: MaskHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> usize {
        let due = self.debouncer.take_due(now);
        for editor in &due {
            self.render_editor(host, *editor);
        }
        due.len()
    }

    /// Clear every controller, re-read the configuration and render all visible editors.
    pub fn reload<H: MaskHost + ?Sized>(&mut self, host: &mut H) {
        self.clear_mask_decorations(host);
        self.configured = host.mask_configuration();
        self.patterns.clear();
        tracing::debug!(masks = self.configured.len(), "mask configuration reloaded");
        self.render_visible(host);
    }

    /// Supply masks from another integration and re-render. An empty list is ignored.
    pub fn add_additional_masks<H: MaskHost + ?Sized>(
        &mut self,
        host: &mut H,
        masks: Vec<MaskDefinition>,
    ) {
        if masks.is_empty() {
            return;
        }
        match self.settings.additional_masks {
            AdditionalMasksMode::Accumulate => self.additional.extend(masks),
            AdditionalMasksMode::Replace => {
                // Handles keyed by the previous set would otherwise linger.
                self.clear_mask_decorations(host);
                self.additional = masks;
            }
        }
        self.render_visible(host);
    }

    /// Remove every decoration from every editor and cancel pending renders.
    pub fn clear_mask_decorations<H: MaskHost + ?Sized>(&mut self, host: &mut H) {
        self.debouncer.cancel_all();
        for controller in self.controllers.values_mut() {
            controller.clear(host);
        }
    }

    /// Release controllers of closed editors, then find or create controllers for every visible
    /// editor and render them.
    ///
    /// Hidden editors the host still knows keep their controllers.
    pub fn render_visible<H: MaskHost + ?Sized>(&mut self, host: &mut H) {
        self.prune_closed(host);
        for editor in host.visible_editors() {
            self.render_editor(host, editor);
        }
    }

    /// Apply every mask whose language selector matches `editor`'s document.
    ///
    /// A pattern that fails to compile is logged and skipped; the others still apply.
    pub fn render_editor<H: MaskHost + ?Sized>(
        &mut self,
        host: &mut H,
        editor: EditorId,
    ) -> ApplyStats {
        self.debouncer.cancel(&editor);

        let mut total = ApplyStats::default();
        let Some(language_id) = host.language_id(editor) else {
            return total;
        };

        let Self {
            configured,
            additional,
            patterns,
            controllers,
            ..
        } = self;
        let controller = controllers
            .entry(editor)
            .or_insert_with(|| MaskController::new(Some(editor)));

        for definition in configured.iter().chain(additional.iter()) {
            if !definition.applies_to(&language_id) {
                continue;
            }
            for entry in &definition.patterns {
                let compiled = match patterns.get_or_compile(&entry.pattern, entry.ignore_case) {
                    Ok(compiled) => compiled,
                    Err(err) => {
                        tracing::warn!(%editor, error = %err, "skipping mask pattern");
                        continue;
                    }
                };
                let stats = controller.apply(host, compiled, &entry.to_mask());
                total.masked += stats.masked;
                total.revealed += stats.revealed;
            }
        }

        total
    }

    /// Drop the controller of every editor whose document the host can no longer resolve.
    fn prune_closed<H: MaskHost + ?Sized>(&mut self, host: &mut H) {
        let closed: Vec<EditorId> = self
            .controllers
            .keys()
            .copied()
            .filter(|editor| host.language_id(*editor).is_none())
            .collect();
        for editor in closed {
            tracing::debug!(%editor, "releasing controller of closed editor");
            self.remove_controller(host, editor);
        }
    }

    /// Clear and drop the controller of an editor the host has closed.
    pub fn remove_controller<H: MaskHost + ?Sized>(&mut self, host: &mut H, editor: EditorId) {
        self.debouncer.cancel(&editor);
        if let Some(mut controller) = self.controllers.remove(&editor) {
            controller.clear(host);
        }
    }
}
