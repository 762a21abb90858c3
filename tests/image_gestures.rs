use egui::{Color32, Pos2, Vec2};
use image::{ImageFormat, Rgba, RgbaImage};
use picture_editor::image::{PendingImage, decode_image};
use picture_editor::{EditorError, EditorEvent, EditorState, EventLog, ImageGesture, LayerId, LayerImage, Tool};
use std::io::Cursor;

fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let source = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    source
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode test png");
    bytes
}

/// 400x300 canvas with a 100x50 red image centred at (200, 150), Image tool active
fn image_editor() -> (EditorState, LayerId) {
    let mut editor = EditorState::new();
    editor.attach_canvas(400, 300);
    let image = LayerImage::new(RgbaImage::from_pixel(100, 50, Rgba([255, 0, 0, 255])));
    let id = editor.insert_image(image);
    editor.set_selected_tool(Tool::Image);
    (editor, id)
}

fn image_of(editor: &EditorState, id: LayerId) -> picture_editor::ImageContent {
    editor
        .layer(id)
        .and_then(|layer| layer.as_image())
        .cloned()
        .expect("image layer")
}

fn wait_for_uploads(editor: &mut EditorState) -> Vec<LayerId> {
    let mut added = Vec::new();
    for _ in 0..500 {
        added.extend(editor.poll_image_uploads());
        if editor.pending_uploads() == 0 {
            return added;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    panic!("image decode did not finish");
}

#[test]
fn test_upload_adds_centred_selected_layer() {
    let mut editor = EditorState::new();
    editor.attach_canvas(320, 240);
    editor.upload_image("photo.png", png_bytes(40, 20, [0, 0, 255, 255]));

    let added = wait_for_uploads(&mut editor);
    assert_eq!(added.len(), 1);
    let image = image_of(&editor, added[0]);
    assert_eq!(image.center, Pos2::new(160.0, 120.0));
    assert_eq!(image.scale(), 1.0);
    assert_eq!(editor.selected_layer(), Some(added[0]));
    assert!(editor.can_undo());

    let surface = editor.surface().expect("canvas");
    assert_eq!(surface.pixel(160, 120), Some(Color32::BLUE));
}

#[test]
fn test_failed_upload_adds_nothing() {
    let mut editor = EditorState::new();
    let log = EventLog::new(16);
    editor.subscribe(Box::new(log.clone()));

    editor.upload_image("broken.png", b"definitely not a png".to_vec());
    let added = wait_for_uploads(&mut editor);
    assert!(added.is_empty());
    assert!(editor.layers().is_empty());
    assert!(!editor.can_undo());
    assert_eq!(log.last(), Some(EditorEvent::ImageLoadFailed("broken.png".to_owned())));
}

#[test]
fn test_queued_ready_image() {
    let mut editor = EditorState::new();
    let decoded = decode_image(&png_bytes(3, 3, [1, 2, 3, 255]));
    editor.queue_image(PendingImage::ready("ready.png", decoded));
    assert_eq!(editor.pending_uploads(), 1);

    let added = editor.poll_image_uploads();
    assert_eq!(added.len(), 1);
    // No canvas yet: placed at the origin
    assert_eq!(image_of(&editor, added[0]).center, Pos2::ZERO);
    assert_eq!(editor.pending_uploads(), 0);
}

#[test]
fn test_decode_failure_kind() {
    let result = futures::executor::block_on(PendingImage::spawn("x.png", vec![0, 1, 2]));
    assert!(matches!(result, Err(EditorError::ImageDecode(_))));
}

#[test]
fn test_resize_from_handle() {
    let (mut editor, id) = image_editor();
    // Bottom-right corner sits at (250, 175)
    assert!(editor.start_resizing(Pos2::new(250.0, 175.0)));
    assert!(editor.is_resizing());

    // dx/w = 100/100 = 1, dy/h = 75/50 = 1.5  -> larger axis wins
    editor.resize_image(Pos2::new(300.0, 225.0));
    assert_eq!(image_of(&editor, id).scale(), 1.5);

    editor.stop_resizing();
    assert_eq!(editor.image_gesture(), ImageGesture::Idle);
    // Moves after release change nothing
    editor.resize_image(Pos2::new(390.0, 290.0));
    assert_eq!(image_of(&editor, id).scale(), 1.5);
}

#[test]
fn test_resize_is_clamped() {
    let (mut editor, id) = image_editor();
    assert!(editor.start_resizing(Pos2::new(245.0, 170.0)));

    editor.resize_image(Pos2::new(1000.0, 1000.0));
    assert_eq!(image_of(&editor, id).scale(), 3.0);

    editor.resize_image(Pos2::new(200.0, 150.0));
    assert_eq!(image_of(&editor, id).scale(), 0.1);

    // Pointer up-left of the centre: both ratios negative
    editor.resize_image(Pos2::new(0.0, 0.0));
    assert_eq!(image_of(&editor, id).scale(), 0.1);
}

#[test]
fn test_handle_follows_scale() {
    let (mut editor, id) = image_editor();
    editor.start_resizing(Pos2::new(250.0, 175.0));
    editor.resize_image(Pos2::new(400.0, 150.0));
    editor.stop_resizing();
    // Scale 2: bounds now span (100, 100)..(300, 200)
    assert_eq!(image_of(&editor, id).scale(), 2.0);
    assert!(!editor.start_resizing(Pos2::new(250.0, 175.0)));
    assert!(editor.start_resizing(Pos2::new(300.0, 200.0)));
}

#[test]
fn test_drag_is_relative_to_grab_point() {
    let (mut editor, id) = image_editor();
    assert!(editor.start_dragging_image(Pos2::new(180.0, 140.0)));
    assert_eq!(
        editor.image_gesture(),
        ImageGesture::Dragging {
            offset: Vec2::new(-20.0, -10.0)
        }
    );

    // No jump on the first move to the grab point itself
    editor.drag_image(Pos2::new(180.0, 140.0));
    assert_eq!(image_of(&editor, id).center, Pos2::new(200.0, 150.0));

    editor.drag_image(Pos2::new(80.0, 40.0));
    assert_eq!(image_of(&editor, id).center, Pos2::new(100.0, 50.0));

    let surface = editor.surface().expect("canvas");
    assert_eq!(surface.pixel(100, 50), Some(Color32::RED));
    assert_eq!(surface.pixel(200, 150), Some(Color32::WHITE));
}

#[test]
fn test_drag_outside_image_does_not_start() {
    let (mut editor, _) = image_editor();
    assert!(!editor.start_dragging_image(Pos2::new(10.0, 10.0)));
    assert_eq!(editor.image_gesture(), ImageGesture::Idle);
}

#[test]
fn test_transforms_are_not_undoable_steps() {
    let (mut editor, id) = image_editor();
    let history = editor.history_len();
    editor.start_dragging_image(Pos2::new(200.0, 150.0));
    editor.drag_image(Pos2::new(20.0, 20.0));
    editor.stop_resizing();
    assert_eq!(editor.history_len(), history);

    // Undo removes the image rather than the move
    editor.undo();
    assert!(editor.layer(id).is_none());
}

#[test]
fn test_selected_image_shows_handle() {
    let (mut editor, id) = image_editor();
    // Handle outline: 16x16 centred on (250, 175), top-left pixel at (242, 167)
    let surface = editor.surface().expect("canvas");
    assert_eq!(surface.pixel(242, 167), Some(Color32::BLACK));
    assert_eq!(surface.pixel(257, 182), Some(Color32::BLACK));

    editor.select_layer(id);
    let surface = editor.surface().expect("canvas");
    assert_eq!(surface.pixel(257, 182), Some(Color32::WHITE));
}
