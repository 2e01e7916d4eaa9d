use annotink_core::editor::{EditorConfig, EditorError, EditorState};
use annotink_core::input::{ClickTarget, Key, KeyPress, Modifiers};
use annotink_core::shapes::{PrimitiveKind, Shape, ShapeKind, Transform};
use annotink_core::shortcuts::ShortcutAction;
use annotink_core::viewport::{MAX_SCALE, MIN_SCALE};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn kinds(editor: &EditorState) -> Vec<ShapeKind> {
    editor.objects().iter().map(Shape::kind).collect()
}

fn text_content(editor: &EditorState, index: usize) -> String {
    editor.objects()[index]
        .as_text()
        .map(|t| t.content.clone())
        .unwrap_or_default()
}

#[test]
fn test_n_mutations_then_n_undos_restore_initial_document() {
    init_logger();
    let mut editor = EditorState::default();
    let initial = editor.objects().to_vec();

    let rect = editor.add_shape(PrimitiveKind::Rectangle);
    editor.add_shape(PrimitiveKind::Star);
    editor.click(ClickTarget::Object(rect));
    editor.transform_selected(Transform::at(300.0, 300.0)).unwrap();
    editor.add_text();
    editor.move_selected_forward();

    let mutations = editor.history().len() - 1;
    assert_eq!(mutations, 5);
    let before_undo = editor.objects().to_vec();

    for _ in 0..mutations {
        assert!(editor.undo());
    }
    assert_eq!(editor.objects(), initial.as_slice());

    for _ in 0..mutations {
        assert!(editor.redo());
    }
    assert_eq!(editor.objects(), before_undo.as_slice());
}

#[test]
fn test_partial_undo_redo() {
    let mut editor = EditorState::default();
    for kind in PrimitiveKind::all() {
        editor.add_shape(*kind);
    }
    let full = editor.objects().to_vec();

    for _ in 0..3 {
        editor.undo();
    }
    assert_eq!(editor.objects().len(), full.len() - 3);
    for _ in 0..3 {
        editor.redo();
    }
    assert_eq!(editor.objects(), full.as_slice());
}

#[test]
fn test_paint_order_scenario() {
    let mut editor = EditorState::default();
    editor.add_shape(PrimitiveKind::Rectangle);
    editor.add_shape(PrimitiveKind::Circle);
    let text = editor.add_text();
    assert_eq!(
        kinds(&editor),
        vec![ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Text]
    );

    editor.click(ClickTarget::Object(text));
    editor.move_selected_backward();
    assert_eq!(
        kinds(&editor),
        vec![ShapeKind::Rectangle, ShapeKind::Text, ShapeKind::Circle]
    );

    editor.move_selected_forward();
    assert_eq!(
        kinds(&editor),
        vec![ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Text]
    );
}

#[test]
fn test_inline_edit_scenario() {
    let mut editor = EditorState::default();
    let id = editor.add_text();
    editor.set_text_content(id, "A");

    editor.double_click(id).unwrap();
    assert!(!editor.is_visible(id));
    editor.set_edit_value("B");
    let enter = KeyPress::new(Key::Enter).in_text_input();
    assert_eq!(editor.handle_key(&enter), Some(ShortcutAction::CommitTextEdit));
    assert_eq!(text_content(&editor, 0), "B");

    let undo = KeyPress::new(Key::Char('z')).with_modifiers(Modifiers::ctrl());
    editor.handle_key(&undo);
    assert_eq!(text_content(&editor, 0), "A");

    let redo = KeyPress::new(Key::Char('y')).with_modifiers(Modifiers::ctrl());
    editor.handle_key(&redo);
    assert_eq!(text_content(&editor, 0), "B");
}

#[test]
fn test_delete_removes_exactly_one() {
    let mut editor = EditorState::default();
    let a = editor.add_shape(PrimitiveKind::Line);
    let b = editor.add_shape(PrimitiveKind::Arrow);
    let c = editor.add_shape(PrimitiveKind::Circle);

    let before = editor.objects().to_vec();
    assert!(matches!(editor.delete_selected(), Err(EditorError::NoSelection)));
    assert_eq!(editor.objects(), before.as_slice());

    editor.click(ClickTarget::Object(b));
    editor.delete_selected().unwrap();
    let ids: Vec<_> = editor.objects().iter().map(Shape::id).collect();
    assert_eq!(ids, vec![a, c]);
    assert_eq!(editor.selected(), None);
}

#[test]
fn test_zoom_scenario() {
    let mut editor = EditorState::default();
    editor.viewport.zoom_in();
    editor.viewport.zoom_in();
    assert_eq!(editor.viewport.scale, 1.2);

    for _ in 0..25 {
        editor.viewport.zoom_in();
    }
    assert_eq!(editor.viewport.scale, MAX_SCALE);

    for _ in 0..30 {
        editor.viewport.zoom_out();
    }
    assert_eq!(editor.viewport.scale, MIN_SCALE);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_bounded_history_keeps_newest() {
    let mut editor = EditorState::new(EditorConfig {
        history_limit: Some(3),
        ..EditorConfig::default()
    });
    for _ in 0..5 {
        editor.add_shape(PrimitiveKind::Rectangle);
    }
    assert_eq!(editor.history().len(), 3);
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.objects().len(), 3);
}
