use egui::{CursorIcon, Pos2};

use crate::geometry::{is_over_image, is_over_resize_handle};
use crate::state::{EditorState, Tool};

use super::InputEvent;

/// Routes a canvas input event to the editor state.
///
/// A pointer-down starts at most one gesture: the resize handle wins over the image
/// body, and both win over a pen stroke. Shape and Fill commit on `Click`.
pub fn route_event(event: &InputEvent, state: &mut EditorState) {
    match *event {
        InputEvent::PointerDown(pos) => {
            if state.start_resizing(pos) || state.start_dragging_image(pos) {
                return;
            }
            state.start_drawing(pos);
        }
        InputEvent::PointerMove(pos) => {
            if state.is_resizing() {
                state.resize_image(pos);
            } else if state.is_dragging() {
                state.drag_image(pos);
            } else {
                state.continue_drawing(pos);
            }
        }
        InputEvent::PointerUp(_) | InputEvent::PointerLeave => state.stop_resizing(),
        InputEvent::Click(pos) => state.handle_canvas_click(pos),
        InputEvent::Undo => state.undo(),
    }
}

/// Hover affordance over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Grab,
    Resize,
}

impl CursorKind {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            CursorKind::Default => CursorIcon::Default,
            CursorKind::Grab => CursorIcon::Grab,
            CursorKind::Resize => CursorIcon::ResizeNwSe,
        }
    }
}

/// Cursor for a hover at `pos`; only the selected image under the Image tool reacts.
pub fn cursor_at(state: &EditorState, pos: Pos2) -> CursorKind {
    if state.selected_tool() != Tool::Image {
        return CursorKind::Default;
    }
    match state.document().selected_image() {
        Some(image) if is_over_resize_handle(image, pos) => CursorKind::Resize,
        Some(image) if is_over_image(image, pos) => CursorKind::Grab,
        _ => CursorKind::Default,
    }
}
