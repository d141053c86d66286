use egui::{Color32, Pos2};
use propaint::raster::pixel_rgba;
use propaint::{Editor, Element, EngineConfig, EngineError, ToolKind};

fn editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::with_seed(EngineConfig::default(), 3).unwrap()
}

fn red_square(editor: &mut Editor) {
    editor.settings().set_color(Color32::RED);
    editor.set_tool(ToolKind::Shape);
    editor.pointer_down(Pos2::new(10.0, 10.0)).unwrap();
    editor.pointer_move(Pos2::new(60.0, 60.0)).unwrap();
    editor.pointer_up(Pos2::new(60.0, 60.0)).unwrap();
}

#[test]
fn test_last_layer_cannot_be_deleted() {
    let mut editor = editor();
    editor.confirm_text("Hi").unwrap();

    let result = editor.delete_layer();
    assert!(matches!(result, Err(EngineError::LastLayer)));
    assert_eq!(editor.layers().len(), 1);
    assert_eq!(editor.take_notice().as_deref(), Some("Cannot delete the last layer!"));
    assert_eq!(editor.notice(), None);
}

#[test]
fn test_add_and_delete_layer_status() {
    let mut editor = editor();
    editor.add_layer().unwrap();
    assert_eq!(editor.status(), Some("New Layer 2 added"));
    assert_eq!(editor.layers().active_index(), 1);

    editor.delete_layer().unwrap();
    assert_eq!(editor.status(), Some("Layer deleted"));
    assert_eq!(editor.layers().active_index(), 0);
}

#[test]
fn test_duplicate_layer_copies_objects() {
    let mut editor = editor();
    editor.add_layer().unwrap();
    red_square(&mut editor);
    let original = editor.layers().active().unwrap().objects()[0].clone();

    editor.duplicate_layer().unwrap();
    assert_eq!(editor.status(), Some("Layer duplicated"));
    assert_eq!(editor.layers().len(), 3);
    let copy = editor.layers().active().unwrap();
    assert_eq!(copy.objects().len(), 1);
    assert_ne!(copy.objects()[0].id(), original.id());
    assert_eq!(copy.history().len(), 1);
}

fn selected_count(editor: &Editor) -> usize {
    editor
        .layers()
        .layers()
        .iter()
        .flat_map(|layer| layer.objects())
        .filter(|obj| obj.is_selected())
        .count()
}

fn select_at(editor: &mut Editor, pos: Pos2) {
    editor.pointer_down(pos).unwrap();
    editor.pointer_up(pos).unwrap();
}

#[test]
fn test_switching_layers_drops_selection() {
    let mut editor = editor();
    editor.confirm_text("Hi").unwrap();
    editor.set_tool(ToolKind::Select);
    select_at(&mut editor, Pos2::new(60.0, 60.0));
    assert_eq!(selected_count(&editor), 1);

    editor.add_layer().unwrap();
    assert_eq!(selected_count(&editor), 0);

    editor.confirm_text("Yo").unwrap();
    select_at(&mut editor, Pos2::new(60.0, 60.0));
    assert_eq!(selected_count(&editor), 1);

    editor.set_active_layer(0);
    assert_eq!(selected_count(&editor), 0);
    // The layer left behind no longer shows its handles.
    let top = editor.layers().get(1).unwrap();
    assert_eq!(pixel_rgba(top.frame(), 50, 47), Some([0, 0, 0, 0]));

    select_at(&mut editor, Pos2::new(60.0, 60.0));
    editor.duplicate_layer().unwrap();
    assert_eq!(selected_count(&editor), 0);
}

#[test]
fn test_reorder_follows_active_layer() {
    let mut editor = editor();
    let top = editor.add_layer().unwrap();
    assert!(editor.move_layer_down());
    assert_eq!(editor.layers().active_index(), 0);
    assert_eq!(editor.layers().active().unwrap().id(), top);
    assert!(!editor.move_layer_down());
}

#[test]
fn test_export_flattens_visible_layers_over_white() {
    let mut editor = editor();
    editor.add_layer().unwrap();
    red_square(&mut editor);

    let flat = editor.flatten().unwrap();
    assert_eq!(pixel_rgba(&flat, 30, 30), Some([255, 0, 0, 255]));
    assert_eq!(pixel_rgba(&flat, 300, 200), Some([255, 255, 255, 255]));

    editor.toggle_layer_visibility(1).unwrap();
    let flat = editor.flatten().unwrap();
    assert_eq!(pixel_rgba(&flat, 30, 30), Some([255, 255, 255, 255]));
}

#[test]
fn test_export_has_no_selection_decoration() {
    let mut editor = editor();
    red_square(&mut editor);
    editor.set_tool(ToolKind::Select);
    editor.pointer_down(Pos2::new(30.0, 30.0)).unwrap();
    editor.pointer_up(Pos2::new(30.0, 30.0)).unwrap();

    let flat = editor.flatten().unwrap();
    // The selection box sits 2 units outside the shape.
    assert_eq!(pixel_rgba(&flat, 7, 30), Some([255, 255, 255, 255]));
}

#[test]
fn test_export_png_and_data_url() {
    let mut editor = editor();
    let png = editor.export_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (400, 300));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);

    let url = editor.export_data_url().unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
}

#[test]
fn test_resize_viewport_keeps_objects() {
    let mut editor = editor();
    red_square(&mut editor);
    editor.resize_viewport(800, 600).unwrap();

    let layer = editor.layers().active().unwrap();
    assert_eq!(layer.size(), (800, 600));
    assert_eq!(layer.objects().len(), 1);
    assert_eq!(pixel_rgba(layer.frame(), 30, 30), Some([255, 0, 0, 255]));

    editor.resize_viewport(100, 100).unwrap();
    assert_eq!(editor.layers().size(), (400, 300));
}
