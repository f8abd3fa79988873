//! Integration tests: pointer and keyboard gestures (pse-editor).
//!
//! Drives the editor with raw `InputEvent`s the way the browser bridge
//! does and checks the resulting store state.

use pretty_assertions::assert_eq;
use pse_core::model::*;
use pse_core::ApproxMeasure;
use pse_editor::input::{InputEvent, Modifiers};
use pse_editor::tools::Gesture;
use pse_editor::{Editor, EditorAction, PanelView};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn send(editor: &mut Editor, event: InputEvent) -> bool {
    editor.handle_input(&event, &ApproxMeasure)
}

fn key(name: &str) -> InputEvent {
    InputEvent::Key {
        key: name.to_string(),
        modifiers: Modifiers::NONE,
    }
}

fn logo_box(editor: &Editor) -> Bounds {
    editor.store().logo().map(|l| l.bounds()).unwrap_or_default()
}

#[test]
fn drag_logo_past_boundary_is_clamped() {
    init_logger();
    let mut editor = Editor::default();
    editor.apply(EditorAction::SetLogo(Raster::solid(4, 4, Color::BLACK)));
    editor.apply(EditorAction::Select(Selection::None));

    send(&mut editor, InputEvent::pointer_down(150.0, 150.0));
    assert_eq!(editor.selection(), Selection::Logo);

    send(&mut editor, InputEvent::pointer_move(170.0, 160.0));
    assert_eq!(logo_box(&editor).origin(), Point::new(120.0, 110.0));

    send(&mut editor, InputEvent::pointer_move(900.0, 900.0));
    assert_eq!(logo_box(&editor).origin(), Point::new(650.0, 450.0));

    send(&mut editor, InputEvent::pointer_up(900.0, 900.0));
    assert_eq!(editor.gesture(), Gesture::Idle);
    assert!(!send(&mut editor, InputEvent::pointer_move(300.0, 300.0)));
}

#[test]
fn drag_text_keeps_grab_offset() {
    let mut editor = Editor::default();
    editor.apply(EditorAction::AddText);
    let Selection::Text(id) = editor.selection() else {
        panic!("new text should be selected");
    };

    send(&mut editor, InputEvent::pointer_down(60.0, 55.0));
    send(&mut editor, InputEvent::pointer_move(210.0, 105.0));
    assert_eq!(
        editor.store().text(id).unwrap().position,
        Point::new(200.0, 100.0)
    );

    send(&mut editor, InputEvent::pointer_move(0.0, 0.0));
    assert_eq!(
        editor.store().text(id).unwrap().position,
        Point::new(50.0, 50.0)
    );
}

#[test]
fn resize_logo_from_corner_handle() {
    init_logger();
    let mut editor = Editor::default();
    editor.apply(EditorAction::SetLogo(Raster::solid(4, 4, Color::BLACK)));

    // Bottom-right handle of (100, 100, 100, 100).
    send(&mut editor, InputEvent::pointer_down(201.0, 199.0));
    assert!(matches!(
        editor.gesture(),
        Gesture::Resizing {
            handle: Handle::BottomRight,
            ..
        }
    ));

    send(&mut editor, InputEvent::pointer_move(231.0, 219.0));
    assert_eq!(logo_box(&editor), Bounds::new(100.0, 100.0, 130.0, 120.0));

    // Past the right edge: whole step rejected.
    send(&mut editor, InputEvent::pointer_move(901.0, 219.0));
    assert_eq!(logo_box(&editor), Bounds::new(100.0, 100.0, 130.0, 120.0));

    // Below the minimum size: rejected.
    send(&mut editor, InputEvent::pointer_move(106.0, 219.0));
    assert_eq!(logo_box(&editor), Bounds::new(100.0, 100.0, 130.0, 120.0));

    send(&mut editor, InputEvent::pointer_up(106.0, 219.0));
    assert_eq!(
        editor.panel(),
        PanelView::Logo {
            x: 100.0,
            y: 100.0,
            width: 130.0,
            height: 120.0
        }
    );
}

#[test]
fn text_has_no_resize_handles() {
    let mut editor = Editor::default();
    editor.apply(EditorAction::AddText);
    // Bottom-right corner of the 168x20 text box at (50, 50).
    send(&mut editor, InputEvent::pointer_down(218.0, 70.0));
    assert!(matches!(editor.gesture(), Gesture::Dragging { .. }));
}

#[test]
fn click_on_empty_stage_deselects() {
    let mut editor = Editor::default();
    editor.apply(EditorAction::AddText);
    assert!(send(&mut editor, InputEvent::pointer_down(600.0, 400.0)));
    assert_eq!(editor.selection(), Selection::None);
    assert!(editor.panel().is_hidden());
}

#[test]
fn delete_key_during_drag_cancels_gesture() {
    let mut editor = Editor::default();
    editor.apply(EditorAction::SetLogo(Raster::solid(4, 4, Color::BLACK)));
    send(&mut editor, InputEvent::pointer_down(150.0, 150.0));
    assert!(send(&mut editor, key("Delete")));

    assert!(editor.store().logo().is_none());
    assert_eq!(editor.gesture(), Gesture::Idle);
    assert!(!send(&mut editor, InputEvent::pointer_move(200.0, 200.0)));
}

#[test]
fn topmost_text_is_picked() {
    let mut editor = Editor::default();
    editor.apply(EditorAction::AddText);
    editor.apply(EditorAction::AddText);
    let second = editor.store().texts()[1].id;
    editor.apply(EditorAction::Select(Selection::None));

    send(&mut editor, InputEvent::pointer_down(60.0, 60.0));
    assert_eq!(editor.selection(), Selection::Text(second));
}
