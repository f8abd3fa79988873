//! Integration tests: overlay store state transitions (pse-core).
//!
//! Exercises the store through its public API only: shallow merges,
//! style toggling, deletion and the selection state machine.

use pretty_assertions::assert_eq;
use pse_core::id::OverlayId;
use pse_core::model::*;
use pse_core::{Commit, OverlayStore};

fn store_with_texts(n: usize) -> (OverlayStore, Vec<OverlayId>) {
    let mut store = OverlayStore::default();
    let ids = (0..n).map(|_| store.add_text()).collect();
    (store, ids)
}

// ─── updateText ─────────────────────────────────────────────────────────

#[test]
fn update_changes_only_named_fields_of_target() {
    let (mut store, ids) = store_with_texts(3);
    let before: Vec<TextOverlay> = store.texts().to_vec();

    let commit = store.update_text(
        ids[1],
        TextPatch {
            content: Some("Sale!".into()),
            font_size: Some(48.0),
            ..Default::default()
        },
    );
    assert_eq!(commit, Commit::TextUpdated(ids[1]));

    let after = store.texts();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);

    let mut expected = before[1].clone();
    expected.content = "Sale!".into();
    expected.font_size = 48.0;
    assert_eq!(after[1], expected);
}

#[test]
fn update_from_json_patch() {
    let (mut store, ids) = store_with_texts(1);
    let patch: TextPatch = serde_json::from_str(
        r##"{"color": "#ff0000", "rotation": 30, "fontFamily": "Impact", "position": {"x": 120, "y": 80}}"##,
    )
    .unwrap();
    store.update_text(ids[0], patch);

    let text = store.text(ids[0]).unwrap();
    assert_eq!(text.color.to_hex(), "#FF0000");
    assert_eq!(text.rotation, 30.0);
    assert_eq!(text.font_family, "Impact");
    assert_eq!(text.position, Point::new(120.0, 80.0));
    assert_eq!(text.content, "Your Text Here");
}

#[test]
fn unknown_patch_fields_are_rejected_by_the_parser() {
    let result = serde_json::from_str::<TextPatch>(r#"{"fontsize": 12}"#);
    assert!(result.is_err());
}

// ─── toggleTextStyle ────────────────────────────────────────────────────

#[test]
fn toggling_bold_twice_restores_style_set() {
    let (mut store, ids) = store_with_texts(1);
    store.toggle_text_style(ids[0], FontStyle::Italic);
    let original = store.text(ids[0]).unwrap().font_style.clone();

    store.toggle_text_style(ids[0], FontStyle::Bold);
    assert!(store.text(ids[0]).unwrap().font_style.contains(FontStyle::Bold));
    store.toggle_text_style(ids[0], FontStyle::Bold);

    assert_eq!(store.text(ids[0]).unwrap().font_style, original);
}

#[test]
fn toggle_missing_text_is_noop() {
    let mut store = OverlayStore::default();
    assert_eq!(
        store.toggle_text_style(OverlayId::intern("missing"), FontStyle::Bold),
        Commit::None
    );
}

// ─── deleteText ─────────────────────────────────────────────────────────

#[test]
fn deleting_selected_text_clears_selection() {
    let (mut store, ids) = store_with_texts(2);
    assert_eq!(store.selection(), Selection::Text(ids[1]));
    store.delete_text(ids[1]);
    assert_eq!(store.selection(), Selection::None);
    assert_eq!(store.texts().len(), 1);
}

#[test]
fn deleting_unselected_text_keeps_selection() {
    let (mut store, ids) = store_with_texts(2);
    store.delete_text(ids[0]);
    assert_eq!(store.selection(), Selection::Text(ids[1]));
    assert!(store.text(ids[0]).is_none());
}

#[test]
fn deleting_absent_text_is_noop() {
    let (mut store, _) = store_with_texts(1);
    let rev = store.revision();
    assert_eq!(store.delete_text(OverlayId::intern("absent")), Commit::None);
    assert_eq!(store.revision(), rev);
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn add_text_on_empty_state() {
    let mut store = OverlayStore::default();
    let id = store.add_text();
    assert_eq!(store.texts().len(), 1);
    let text = &store.texts()[0];
    assert_eq!(text.id, id);
    assert_eq!(text.content, "Your Text Here");
    assert_eq!(text.font_size, 20.0);
    assert_eq!(text.position, Point::new(50.0, 50.0));
    assert_eq!(store.selection(), Selection::Text(id));
}

#[test]
fn two_adds_produce_distinct_ids_and_select_the_second() {
    let mut store = OverlayStore::default();
    let first = store.add_text();
    let second = store.add_text();
    assert_ne!(first, second);
    assert_eq!(store.selection(), Selection::Text(second));
    // Paint order follows insertion order.
    assert_eq!(store.texts()[0].id, first);
    assert_eq!(store.texts()[1].id, second);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let mut store = OverlayStore::default();
    let first = store.add_text();
    store.delete_text(first);
    let second = store.add_text();
    assert_ne!(first, second);
}

#[test]
fn delete_logo_while_text_selected_clears_selection() {
    let mut store = OverlayStore::default();
    store.set_logo(Raster::solid(10, 10, Color::BLACK));
    let id = store.add_text();
    assert_eq!(store.selection(), Selection::Text(id));

    store.delete_logo();
    assert_eq!(store.selection(), Selection::None);
    assert!(store.logo().is_none());
    assert!(store.text(id).is_some());
}

#[test]
fn selection_state_machine() {
    let mut store = OverlayStore::default();
    let id = store.add_text();
    store.set_logo(Raster::solid(10, 10, Color::BLACK));
    assert_eq!(store.selection(), Selection::Logo);

    assert_eq!(
        store.select(Selection::Text(id)),
        Commit::Selected(Selection::Text(id))
    );
    assert_eq!(store.select(Selection::Text(id)), Commit::None);
    store.select(Selection::None);
    assert_eq!(store.selection(), Selection::None);
    store.select(Selection::Logo);
    store.delete_logo();
    assert_eq!(store.selection(), Selection::None);
}

#[test]
fn every_change_bumps_revision() {
    let mut store = OverlayStore::default();
    let id = store.add_text();
    let r1 = store.revision();
    store.toggle_text_style(id, FontStyle::Bold);
    let r2 = store.revision();
    store.move_overlay(OverlayKey::Text(id), Point::new(60.0, 60.0));
    let r3 = store.revision();
    assert!(r1 < r2 && r2 < r3);
}
