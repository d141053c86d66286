use egui::{Color32, Pos2};
use propaint::raster::pixel_rgba;
use propaint::{EngineConfig, Editor, ShapeKind, ToolKind};

fn editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::with_seed(EngineConfig::default(), 7).unwrap()
}

fn brush_line(editor: &mut Editor, from: Pos2, to: Pos2) {
    editor.pointer_down(from).unwrap();
    editor.pointer_move(to).unwrap();
    editor.pointer_up(to).unwrap();
}

fn active_pixel(editor: &Editor, x: u32, y: u32) -> [u8; 4] {
    pixel_rgba(editor.layers().active().unwrap().raster(), x, y).unwrap()
}

#[test]
fn test_history_is_capped_at_sixty_entries() {
    let mut editor = editor();
    for _ in 0..70 {
        editor.flip_horizontal().unwrap();
    }
    let history = editor.layers().active().unwrap().history();
    assert_eq!(history.len(), 60);
    assert_eq!(history.index(), Some(59));
    assert!(!history.can_redo());
}

#[test]
fn test_full_history_evicts_the_oldest_entry() {
    let mut editor = editor();
    editor.settings().set_color(Color32::RED);
    editor.set_tool(ToolKind::Fill);
    editor.pointer_down(Pos2::new(5.0, 5.0)).unwrap();
    editor.pointer_up(Pos2::new(5.0, 5.0)).unwrap();
    // 1 blank baseline + 1 fill + 59 flips = 61 pushes
    for _ in 0..59 {
        editor.flip_vertical().unwrap();
    }
    assert_eq!(editor.layers().active().unwrap().history().len(), 60);

    for _ in 0..59 {
        editor.undo().unwrap();
    }
    let history = editor.layers().active().unwrap().history();
    assert_eq!(history.index(), Some(0));
    // The oldest surviving entry is the fill, not the blank baseline.
    assert_eq!(active_pixel(&editor, 200, 150), [255, 0, 0, 255]);
}

#[test]
fn test_undo_redo_restores_pixels() {
    let mut editor = editor();
    brush_line(&mut editor, Pos2::new(100.0, 100.0), Pos2::new(150.0, 100.0));
    assert_eq!(active_pixel(&editor, 125, 100), [0, 0, 0, 255]);
    assert_eq!(editor.layers().active().unwrap().history().len(), 2);

    editor.undo().unwrap();
    assert_eq!(active_pixel(&editor, 125, 100), [255, 255, 255, 255]);
    assert_eq!(editor.layers().active().unwrap().history().index(), Some(0));

    editor.redo().unwrap();
    assert_eq!(active_pixel(&editor, 125, 100), [0, 0, 0, 255]);
    assert_eq!(editor.layers().active().unwrap().history().index(), Some(1));
}

#[test]
fn test_new_action_after_undo_prunes_redo() {
    let mut editor = editor();
    brush_line(&mut editor, Pos2::new(20.0, 20.0), Pos2::new(60.0, 20.0));
    brush_line(&mut editor, Pos2::new(20.0, 60.0), Pos2::new(60.0, 60.0));
    editor.undo().unwrap();
    brush_line(&mut editor, Pos2::new(20.0, 100.0), Pos2::new(60.0, 100.0));

    let history = editor.layers().active().unwrap().history();
    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(active_pixel(&editor, 40, 60), [255, 255, 255, 255]);
    assert_eq!(active_pixel(&editor, 40, 100), [0, 0, 0, 255]);
}

#[test]
fn test_undo_past_first_entry_resets_layer() {
    let mut editor = editor();
    editor.undo().unwrap();
    let layer = editor.layers().active().unwrap();
    assert_eq!(layer.history().len(), 1);
    assert_eq!(layer.history().index(), Some(0));
    assert_eq!(active_pixel(&editor, 10, 10), [255, 255, 255, 255]);
}

#[test]
fn test_undo_removes_committed_shape() {
    let mut editor = editor();
    editor.settings().set_shape(ShapeKind::Rectangle);
    editor.set_tool(ToolKind::Shape);
    editor.pointer_down(Pos2::new(10.0, 10.0)).unwrap();
    editor.pointer_move(Pos2::new(60.0, 40.0)).unwrap();
    editor.pointer_up(Pos2::new(60.0, 40.0)).unwrap();
    assert_eq!(editor.layers().active().unwrap().objects().len(), 1);

    editor.undo().unwrap();
    assert!(editor.layers().active().unwrap().objects().is_empty());

    editor.redo().unwrap();
    let layer = editor.layers().active().unwrap();
    assert_eq!(layer.objects().len(), 1);
    assert!(layer.selected().is_none());
}

#[test]
fn test_fill_twice_pushes_one_entry() {
    let mut editor = editor();
    editor.settings().set_color(Color32::RED);
    editor.set_tool(ToolKind::Fill);
    editor.pointer_down(Pos2::new(200.0, 150.0)).unwrap();
    editor.pointer_up(Pos2::new(200.0, 150.0)).unwrap();
    editor.pointer_down(Pos2::new(200.0, 150.0)).unwrap();
    editor.pointer_up(Pos2::new(200.0, 150.0)).unwrap();

    assert_eq!(editor.layers().active().unwrap().history().len(), 2);
    assert_eq!(active_pixel(&editor, 0, 0), [255, 0, 0, 255]);
}

#[test]
fn test_clear_resets_objects_and_history() {
    let mut editor = editor();
    brush_line(&mut editor, Pos2::new(100.0, 100.0), Pos2::new(150.0, 100.0));
    editor.confirm_text("note").unwrap();
    editor.clear().unwrap();

    let layer = editor.layers().active().unwrap();
    assert!(layer.objects().is_empty());
    assert_eq!(layer.history().len(), 1);
    assert_eq!(active_pixel(&editor, 125, 100), [255, 255, 255, 255]);
}
