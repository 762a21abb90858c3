use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect, Response};

mod router;
pub use router::{CursorKind, cursor_at, route_event};

/// Canvas interactions in canvas-local coordinates (origin at the canvas top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown(Pos2),
    /// Pointer moved over the canvas, with or without a button held
    PointerMove(Pos2),
    /// Primary button released over the canvas
    PointerUp(Pos2),
    /// Pointer left the canvas
    PointerLeave,
    /// Press and release without a drag in between
    Click(Pos2),
    /// Ctrl+Z or Cmd+Z
    Undo,
}

/// Ctrl on every platform, Cmd on macOS
pub fn is_undo_shortcut(key: Key, modifiers: Modifiers) -> bool {
    key == Key::Z && !modifiers.shift && (modifiers.ctrl || modifiers.mac_cmd || modifiers.command)
}

/// Converts raw egui input into [`InputEvent`]s for one canvas
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    /// Canvas pixels per egui point; the surface is sized in physical pixels
    pixels_per_point: f32,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect: Rect::NOTHING,
            pixels_per_point: 1.0,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            self.pixels_per_point = pixels_per_point;
        }
    }

    /// Screen position (points) to canvas-local position (surface pixels)
    pub fn to_canvas(&self, pos: Pos2) -> Pos2 {
        ((pos - self.canvas_rect.min) * self.pixels_per_point).to_pos2()
    }

    /// Canvas-local pointer position, if the pointer is over the canvas
    pub fn hover_pos(&self) -> Option<Pos2> {
        self.last_pointer_pos
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// `response` is the canvas widget's response, used only for click detection.
    pub fn process_input(&mut self, ctx: &Context, response: &Response) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let inside = input
                .pointer
                .hover_pos()
                .filter(|pos| self.canvas_rect.contains(*pos))
                .map(|pos| self.to_canvas(pos));

            let mut pressed_at = None;
            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = inside {
                    events.push(InputEvent::PointerDown(pos));
                    pressed_at = Some(pos);
                }
            }

            // A press already reports its position; a move there in the same frame is not motion
            match (inside, self.last_pointer_pos) {
                (Some(pos), last) if Some(pos) != last && Some(pos) != pressed_at => {
                    events.push(InputEvent::PointerMove(pos));
                }
                (None, Some(_)) => events.push(InputEvent::PointerLeave),
                _ => {}
            }
            self.last_pointer_pos = inside;

            if input.pointer.button_released(PointerButton::Primary) {
                if let Some(pos) = inside {
                    events.push(InputEvent::PointerUp(pos));
                }
            }

            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    if is_undo_shortcut(*key, *modifiers) {
                        events.push(InputEvent::Undo);
                    }
                }
            }
        });

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::Click(self.to_canvas(pos)));
            }
        }

        events
    }
}
