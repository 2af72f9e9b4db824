use mask_core::{
    AdditionalMasksMode, DocumentId, EditorId, HeadlessHost, HostEvent, MaskDefinition,
    MaskRegistry, MaskSettings, PatternDefinition,
};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

const RUST_TEXT: &str = "let f = lambda;\nlet s = secret1;";
const PYTHON_TEXT: &str = "x = lambda\ny = secret2";

struct Fixture {
    host: HeadlessHost,
    rust: EditorId,
    python: EditorId,
    rust_doc: DocumentId,
    python_doc: DocumentId,
}

fn configured_masks() -> Vec<MaskDefinition> {
    vec![
        MaskDefinition::new("rust", vec![PatternDefinition::replace_with("lambda", "λ")]),
        MaskDefinition::new("*", vec![PatternDefinition::replace_with(r"secret\d+", "***")]),
    ]
}

fn fixture() -> Fixture {
    let mut host = HeadlessHost::new();
    host.set_mask_configuration(configured_masks());

    let rust_doc = host.open_document(RUST_TEXT, "rust");
    let python_doc = host.open_document(PYTHON_TEXT, "python");
    let rust = host.open_editor(rust_doc).unwrap();
    let python = host.open_editor(python_doc).unwrap();
    host.set_selections(rust, Vec::new()).unwrap();
    host.set_selections(python, Vec::new()).unwrap();

    Fixture {
        host,
        rust,
        python,
        rust_doc,
        python_doc,
    }
}

fn append(host: &mut HeadlessHost, doc: DocumentId, text: &str) {
    let end = host.text(doc).unwrap().chars().count();
    host.insert(doc, end, text).unwrap();
}

#[test]
fn test_activate_renders_visible_editors_by_language() {
    let mut f = fixture();
    let registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());

    assert_eq!(registry.controller_count(), 2);
    assert_eq!(registry.configured_masks().len(), 2);
    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = λ;\nlet s = ***;");
    // The rust-only mask leaves python documents alone.
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\ny = ***");
    assert_eq!(registry.controller(f.rust).unwrap().handle_count(), 2);
    assert_eq!(registry.controller(f.python).unwrap().handle_count(), 1);
}

#[test]
fn test_controllers_are_found_not_recreated() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let now = Instant::now();

    for _ in 0..3 {
        registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
    }
    assert_eq!(registry.controller_count(), 2);
    assert_eq!(f.host.live_decoration_types(), 3);
    assert_eq!(registry.controller(f.rust).unwrap().editor(), Some(f.rust));
}

#[test]
fn test_selection_changes_are_debounced() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let t0 = Instant::now();

    f.host.set_cursor_offset(f.rust, 0).unwrap();
    registry.handle_event(&mut f.host, HostEvent::SelectionChanged { editor: f.rust }, t0);
    assert!(registry.is_render_pending(f.rust));
    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(10)), 0);

    // Caret moves onto `lambda` (offsets 8..14) before the quiet period ends.
    f.host.set_cursor_offset(f.rust, 10).unwrap();
    registry.handle_event(
        &mut f.host,
        HostEvent::SelectionChanged { editor: f.rust },
        t0 + Duration::from_millis(20),
    );
    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = λ;\nlet s = ***;");

    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(50)), 0);
    assert_eq!(
        registry.next_deadline(),
        Some(t0 + Duration::from_millis(70))
    );
    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(70)), 1);
    assert!(!registry.is_render_pending(f.rust));
    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = lambda;\nlet s = ***;");

    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_secs(1)), 0);
}

#[test]
fn test_save_renders_only_the_saved_editor() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());

    let t0 = Instant::now();

    append(&mut f.host, f.rust_doc, "\nsecret5");
    append(&mut f.host, f.python_doc, "\nz = secret4");
    let calls = f.host.set_decorations_calls();

    registry.handle_event(&mut f.host, HostEvent::DocumentSaved { editor: f.rust }, t0);
    assert!(registry.is_render_pending(f.rust));
    assert_eq!(f.host.set_decorations_calls(), calls);

    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(50)), 1);
    assert_eq!(f.host.set_decorations_calls() - calls, 2);
    assert_eq!(
        f.host.render_text(f.rust).unwrap(),
        "let f = λ;\nlet s = ***;\n***"
    );
    assert_eq!(
        f.host.render_text(f.python).unwrap(),
        "x = lambda\ny = ***\nz = secret4"
    );
}

#[test]
fn test_edit_then_save_drops_stale_ranges() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());

    let t0 = Instant::now();

    // Remove `lambda` (offsets 8..14).
    f.host.delete(f.rust_doc, 8, 6).unwrap();
    registry.handle_event(&mut f.host, HostEvent::DocumentSaved { editor: f.rust }, t0);
    registry.poll(&mut f.host, t0 + Duration::from_millis(50));

    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = ;\nlet s = ***;");
    assert_eq!(f.host.decoration_count(f.rust), 1);
    // Handles are kept for the next occurrence.
    assert_eq!(registry.controller(f.rust).unwrap().handle_count(), 2);
}

#[test]
fn test_save_burst_collapses_into_one_render() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let t0 = Instant::now();
    let calls = f.host.set_decorations_calls();

    for _ in 0..5 {
        registry.handle_event(&mut f.host, HostEvent::DocumentSaved { editor: f.rust }, t0);
    }
    assert_eq!(f.host.set_decorations_calls(), calls);
    assert!(registry.is_render_pending(f.rust));

    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(50)), 1);
    // One render: one call per rust pattern.
    assert_eq!(f.host.set_decorations_calls() - calls, 2);
    assert!(!registry.is_render_pending(f.rust));
}

#[test]
fn test_save_and_selection_share_one_pending_render() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let t0 = Instant::now();

    registry.handle_event(&mut f.host, HostEvent::SelectionChanged { editor: f.rust }, t0);
    registry.handle_event(
        &mut f.host,
        HostEvent::DocumentSaved { editor: f.rust },
        t0 + Duration::from_millis(10),
    );
    assert_eq!(
        registry.next_deadline(),
        Some(t0 + Duration::from_millis(60))
    );
    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(50)), 0);
    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(60)), 1);
    assert_eq!(registry.next_deadline(), None);
}

#[test]
fn test_configuration_change_resets_and_reloads() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let now = Instant::now();

    f.host.set_mask_configuration(vec![MaskDefinition::new(
        "*",
        vec![PatternDefinition::replace_with(r"\blet\b", "≔")],
    )]);

    registry.handle_event(
        &mut f.host,
        HostEvent::ConfigurationChanged {
            sections: vec!["editor.fontSize".to_string()],
        },
        now,
    );
    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = λ;\nlet s = ***;");

    registry.handle_event(
        &mut f.host,
        HostEvent::ConfigurationChanged {
            sections: vec!["symbolMasks.masks".to_string()],
        },
        now,
    );
    assert_eq!(registry.configured_masks().len(), 1);
    assert_eq!(
        f.host.render_text(f.rust).unwrap(),
        "≔ f = lambda;\n≔ s = secret1;"
    );
    assert_eq!(f.host.render_text(f.python).unwrap(), PYTHON_TEXT);
    // Old handles are gone; one new base handle per editor.
    assert_eq!(f.host.live_decoration_types(), 2);
}

#[test]
fn test_additional_masks_accumulate() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());

    registry.add_additional_masks(
        &mut f.host,
        vec![MaskDefinition::new(
            "python",
            vec![PatternDefinition::replace_with(r"\by\b", "υ")],
        )],
    );
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\nυ = ***");

    registry.add_additional_masks(
        &mut f.host,
        vec![MaskDefinition::new(
            "*",
            vec![PatternDefinition::replace_with(r"\bs\b", "σ")],
        )],
    );
    assert_eq!(registry.additional_masks().len(), 2);
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\nυ = ***");
    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = λ;\nlet σ = ***;");

    // Supplied masks outlive a configuration reload.
    registry.handle_event(
        &mut f.host,
        HostEvent::ConfigurationChanged {
            sections: vec!["symbolMasks".to_string()],
        },
        Instant::now(),
    );
    assert_eq!(registry.additional_masks().len(), 2);
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\nυ = ***");
}

#[test]
fn test_additional_masks_replace_mode() {
    let mut f = fixture();
    let settings = MaskSettings {
        additional_masks: AdditionalMasksMode::Replace,
        ..MaskSettings::default()
    };
    let mut registry = MaskRegistry::activate(&mut f.host, settings);

    registry.add_additional_masks(
        &mut f.host,
        vec![MaskDefinition::new(
            "python",
            vec![PatternDefinition::replace_with(r"\by\b", "υ")],
        )],
    );
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\nυ = ***");

    registry.add_additional_masks(
        &mut f.host,
        vec![MaskDefinition::new(
            "*",
            vec![PatternDefinition::replace_with(r"\bs\b", "σ")],
        )],
    );
    assert_eq!(registry.additional_masks().len(), 1);
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\ny = ***");
    assert_eq!(f.host.render_text(f.rust).unwrap(), "let f = λ;\nlet σ = ***;");
    // rust: lambda, secret, s; python: secret, s
    assert_eq!(f.host.live_decoration_types(), 5);
}

#[test]
fn test_empty_additional_masks_are_ignored() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let calls = f.host.set_decorations_calls();

    registry.add_additional_masks(&mut f.host, Vec::new());
    assert!(registry.additional_masks().is_empty());
    assert_eq!(f.host.set_decorations_calls(), calls);
}

#[test]
fn test_clear_mask_decorations() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let now = Instant::now();

    registry.handle_event(&mut f.host, HostEvent::SelectionChanged { editor: f.python }, now);
    registry.clear_mask_decorations(&mut f.host);

    assert!(!registry.is_render_pending(f.python));
    assert_eq!(registry.controller_count(), 2);
    assert_eq!(registry.controller(f.rust).unwrap().handle_count(), 0);
    assert_eq!(f.host.live_decoration_types(), 0);
    assert_eq!(f.host.render_text(f.rust).unwrap(), RUST_TEXT);
    assert_eq!(f.host.render_text(f.python).unwrap(), PYTHON_TEXT);

    registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\ny = ***");
}

#[test]
fn test_invalid_pattern_does_not_block_others() {
    let mut host = HeadlessHost::new();
    host.set_mask_configuration(vec![MaskDefinition::new(
        "*",
        vec![
            PatternDefinition::replace_with("(unclosed", "!"),
            PatternDefinition::replace_with(r"secret\d", "***"),
        ],
    )]);
    let doc = host.open_document(PYTHON_TEXT, "python");
    let editor = host.open_editor(doc).unwrap();
    host.set_selections(editor, Vec::new()).unwrap();

    let registry = MaskRegistry::activate(&mut host, MaskSettings::default());
    assert_eq!(host.render_text(editor).unwrap(), "x = lambda\ny = ***");
    assert_eq!(registry.controller(editor).unwrap().handle_count(), 1);
}

#[test]
fn test_hidden_editor_keeps_its_controller() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let now = Instant::now();

    f.host.hide_editor(f.python).unwrap();
    registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
    assert_eq!(registry.controller_count(), 2);
    assert_eq!(registry.controller(f.python).unwrap().handle_count(), 1);

    let doc = f.host.open_document("secret9", "plaintext");
    let third = f.host.open_editor(doc).unwrap();
    registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
    assert_eq!(registry.controller_count(), 3);
    // A fresh editor starts with a caret at offset 0, which touches the match.
    assert_eq!(f.host.render_text(third).unwrap(), "secret9");

    f.host.show_editor(f.python).unwrap();
    registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
    assert_eq!(registry.controller_count(), 3);
    assert_eq!(f.host.render_text(f.python).unwrap(), "x = lambda\ny = ***");
}

#[test]
fn test_remove_controller_releases_handles() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());

    f.host.close_editor(f.python).unwrap();
    registry.remove_controller(&mut f.host, f.python);

    assert_eq!(registry.controller_count(), 1);
    assert!(registry.controller(f.python).is_none());
    assert_eq!(f.host.live_decoration_types(), 2);
}

#[test]
fn test_closed_editors_release_their_controllers() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let now = Instant::now();

    for _ in 0..10 {
        let doc = f.host.open_document("secret9", "plaintext");
        let editor = f.host.open_editor(doc).unwrap();
        f.host.set_selections(editor, Vec::new()).unwrap();
        registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
        assert_eq!(f.host.render_text(editor).unwrap(), "***");

        f.host.close_editor(editor).unwrap();
        registry.handle_event(&mut f.host, HostEvent::VisibleEditorsChanged, now);
        assert!(registry.controller(editor).is_none());
    }

    assert_eq!(registry.controller_count(), 2);
    // rust: lambda, secret; python: secret
    assert_eq!(f.host.live_decoration_types(), 3);
}

#[test]
fn test_debounced_render_of_closed_editor_is_a_noop() {
    let mut f = fixture();
    let mut registry = MaskRegistry::activate(&mut f.host, MaskSettings::default());
    let t0 = Instant::now();

    let doc = f.host.open_document("secret9", "plaintext");
    let editor = f.host.open_editor(doc).unwrap();
    registry.handle_event(&mut f.host, HostEvent::SelectionChanged { editor }, t0);
    f.host.close_editor(editor).unwrap();

    assert_eq!(registry.poll(&mut f.host, t0 + Duration::from_millis(50)), 1);
    assert!(registry.controller(editor).is_none());
    assert_eq!(registry.controller_count(), 2);
}
