//! The editor's single mutable session state.
//!
//! `EditorState` owns the tool settings, the layer stack, the undo history, the
//! transient gesture state and the canvas surface. Operations are synchronous and
//! never fail: when a precondition does not hold (wrong tool, unknown layer, no
//! canvas) the call is a no-op. Every mutation is announced on the event bus, and
//! every change to what the canvas shows ends in a full [`EditorState::redraw`].
//!
//! # Gestures
//!
//! ```text
//!  Pen:    Idle ──start_drawing──► Drawing ──end_drawing──► Idle
//!                                   │  ▲
//!                                   └──┘ continue_drawing
//!
//!  Image:  Idle ──start_resizing──────► Resizing ─┐
//!           │                                     ├─stop_resizing──► Idle
//!           └───start_dragging_image──► Dragging ─┘
//! ```
//!
//! The two machines share one pointer stream but a pointer-down only ever starts one
//! of them, because each is gated on its own tool.
use egui::{Color32, Pos2, Vec2};
use log::{debug, info, warn};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::export;
use crate::geometry::{is_over_image, is_over_resize_handle};
use crate::history::LayerHistory;
use crate::image::PendingImage;
use crate::layer::{ImageContent, Layer, LayerContent, LayerId, LayerImage, LayerKind, ShapeKind};
use crate::renderer::{Renderer, StrokePreview, Surface};

use super::{Tool, ToolSettings};

/// Pen stroke lifecycle
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PenState {
    #[default]
    Idle,
    Drawing {
        points: Vec<Pos2>,
    },
}

/// Image manipulation lifecycle for the selected image layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ImageGesture {
    #[default]
    Idle,
    /// Pointer offset from the image centre at grab time
    Dragging {
        offset: Vec2,
    },
    Resizing,
}

#[derive(Debug)]
pub struct EditorState {
    settings: ToolSettings,
    config: EditorConfig,
    document: Document,
    history: LayerHistory,
    pen: PenState,
    gesture: ImageGesture,
    renderer: Renderer,
    /// `None` until a canvas is attached, and again after teardown
    surface: Option<Surface>,
    event_bus: EventBus,
    pending_images: Vec<PendingImage>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default(), ToolSettings::default())
    }

    pub fn with_config(config: EditorConfig, settings: ToolSettings) -> Self {
        Self {
            settings,
            history: LayerHistory::with_limit(config.history_limit),
            config,
            document: Document::new(),
            pen: PenState::Idle,
            gesture: ImageGesture::Idle,
            renderer: Renderer::new(),
            surface: None,
            event_bus: EventBus::new(),
            pending_images: Vec::new(),
        }
    }

    // ---- Queries -------------------------------------------------------------

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selected_tool(&self) -> Tool {
        self.settings.tool
    }

    pub fn selected_color(&self) -> Color32 {
        self.settings.color
    }

    pub fn selected_shape(&self) -> ShapeKind {
        self.settings.shape
    }

    pub fn pen_size(&self) -> f32 {
        self.settings.pen_size
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layers(&self) -> &[Layer] {
        self.document.layers()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.document.get(id)
    }

    pub fn selected_layer(&self) -> Option<LayerId> {
        self.document.selected()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn pen_state(&self) -> &PenState {
        &self.pen
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.pen, PenState::Drawing { .. })
    }

    /// Points of the stroke in progress, empty when idle
    pub fn current_points(&self) -> &[Pos2] {
        match &self.pen {
            PenState::Drawing { points } => points,
            PenState::Idle => &[],
        }
    }

    pub fn image_gesture(&self) -> ImageGesture {
        self.gesture
    }

    pub fn is_resizing(&self) -> bool {
        self.gesture == ImageGesture::Resizing
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, ImageGesture::Dragging { .. })
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn has_canvas(&self) -> bool {
        self.surface.is_some()
    }

    pub fn pending_uploads(&self) -> usize {
        self.pending_images.len()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    // ---- Settings --------------------------------------------------------------

    /// Switching tools never commits or cancels a stroke in progress.
    pub fn set_selected_tool(&mut self, tool: Tool) {
        let old = self.settings.tool;
        if old == tool {
            return;
        }
        self.settings.tool = tool;
        debug!("Tool changed: {old:?} -> {tool:?}");
        self.event_bus.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    pub fn set_selected_color(&mut self, color: Color32) {
        if self.settings.color != color {
            self.settings.color = color;
            self.event_bus.emit(EditorEvent::ColorChanged(color));
        }
    }

    pub fn set_selected_shape(&mut self, shape: ShapeKind) {
        if self.settings.shape != shape {
            self.settings.shape = shape;
            self.event_bus.emit(EditorEvent::ShapeChanged(shape));
        }
    }

    /// Non-positive or non-finite sizes are ignored.
    pub fn set_pen_size(&mut self, size: f32) {
        if !size.is_finite() || size <= 0.0 || self.settings.pen_size == size {
            return;
        }
        self.settings.pen_size = size;
        self.event_bus.emit(EditorEvent::PenSizeChanged(size));
    }

    // ---- Layer stack -------------------------------------------------------------

    /// Snapshots the stack, appends a new top layer and repaints.
    ///
    /// Image layers become the selected layer.
    pub fn add_layer(&mut self, content: LayerContent) -> LayerId {
        self.history.push_snapshot(self.document.layers());

        let kind = content.kind();
        let id = self.document.push(content);
        info!("Added {} layer {id}", kind.as_str());
        self.event_bus.emit(EditorEvent::LayerAdded { id, kind });

        if kind == LayerKind::Image {
            self.document.select(id);
            self.event_bus.emit(EditorEvent::SelectionChanged(Some(id)));
        }

        self.redraw();
        id
    }

    /// Snapshots and removes the layer. Unknown ids leave history untouched.
    pub fn delete_layer(&mut self, id: LayerId) {
        if !self.document.contains(id) {
            return;
        }
        let was_selected = self.document.selected() == Some(id);
        self.history.push_snapshot(self.document.layers());
        self.document.remove(id);
        info!("Deleted layer {id}");
        self.event_bus.emit(EditorEvent::LayerRemoved { id });

        if was_selected {
            self.gesture = ImageGesture::Idle;
            self.event_bus.emit(EditorEvent::SelectionChanged(None));
        }
        self.redraw();
    }

    /// Flips visibility in place. Not recorded in undo history.
    pub fn toggle_layer_visibility(&mut self, id: LayerId) {
        if let Some(visible) = self.document.toggle_visibility(id) {
            self.event_bus.emit(EditorEvent::VisibilityChanged { id, visible });
            self.redraw();
        }
    }

    /// Selects the layer, or deselects it if it is already selected.
    pub fn select_layer(&mut self, id: LayerId) {
        let before = self.document.selected();
        self.document.toggle_selection(id);
        let after = self.document.selected();
        if before != after {
            self.gesture = ImageGesture::Idle;
            self.event_bus.emit(EditorEvent::SelectionChanged(after));
            self.redraw();
        }
    }

    /// Restores the most recent snapshot. No-op on an empty history.
    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.pop_snapshot() else {
            return;
        };
        self.document.replace_layers(snapshot);
        self.gesture = ImageGesture::Idle;
        info!("Undo, {} snapshots left", self.history.len());
        self.event_bus.emit(EditorEvent::HistoryRestored {
            remaining: self.history.len(),
        });
        self.redraw();
    }

    // ---- Click tools ---------------------------------------------------------------

    /// Commits a Shape or Fill layer for the active tool; other tools ignore clicks.
    pub fn handle_canvas_click(&mut self, pos: Pos2) {
        match self.settings.tool {
            Tool::Shape => {
                self.add_layer(LayerContent::Shape {
                    anchor: pos,
                    kind: self.settings.shape,
                    color: self.settings.color,
                });
            }
            Tool::Fill => {
                self.add_layer(LayerContent::Fill {
                    color: self.settings.color,
                });
            }
            Tool::Pen | Tool::Image | Tool::None => {}
        }
    }

    // ---- Pen ---------------------------------------------------------------------

    pub fn start_drawing(&mut self, pos: Pos2) {
        if self.settings.tool != Tool::Pen {
            return;
        }
        self.pen = PenState::Drawing { points: vec![pos] };
        debug!("Stroke started at {pos:?}");
        self.event_bus.emit(EditorEvent::StrokeStarted);
        self.redraw();
    }

    /// Appends a point to the stroke in progress; a repeat of the last point is dropped.
    pub fn continue_drawing(&mut self, pos: Pos2) {
        if self.settings.tool != Tool::Pen {
            return;
        }
        let PenState::Drawing { points } = &mut self.pen else {
            return;
        };
        if points.last() == Some(&pos) {
            return;
        }
        points.push(pos);
        self.redraw();
    }

    /// Always returns to Idle. Commits a Pen layer only for strokes of two or more
    /// points while the Pen tool is still selected.
    pub fn end_drawing(&mut self) {
        let PenState::Drawing { points } = std::mem::take(&mut self.pen) else {
            return;
        };

        if self.settings.tool == Tool::Pen && points.len() > 1 {
            self.add_layer(LayerContent::Pen {
                points,
                color: self.settings.color,
                width: self.settings.pen_size,
            });
        } else {
            debug!("Stroke discarded with {} points", points.len());
            self.event_bus.emit(EditorEvent::StrokeDiscarded);
            self.redraw();
        }
    }

    // ---- Image manipulation ----------------------------------------------------------

    fn selected_image_for_gesture(&self) -> Option<&ImageContent> {
        if self.settings.tool != Tool::Image {
            return None;
        }
        self.document.selected_image()
    }

    /// Enters Resizing if `pos` hits the selected image's resize handle.
    pub fn start_resizing(&mut self, pos: Pos2) -> bool {
        let Some(image) = self.selected_image_for_gesture() else {
            return false;
        };
        if !is_over_resize_handle(image, pos) {
            return false;
        }
        self.gesture = ImageGesture::Resizing;
        debug!("Resize started at {pos:?}");
        true
    }

    /// Enters Dragging if `pos` lies on the selected image, remembering the grab offset.
    pub fn start_dragging_image(&mut self, pos: Pos2) -> bool {
        let Some(image) = self.selected_image_for_gesture() else {
            return false;
        };
        if !is_over_image(image, pos) {
            return false;
        }
        let offset = pos - image.center;
        self.gesture = ImageGesture::Dragging { offset };
        debug!("Drag started with offset {offset:?}");
        true
    }

    /// Moves the dragged image so the grab point follows the pointer.
    pub fn drag_image(&mut self, pos: Pos2) {
        let ImageGesture::Dragging { offset } = self.gesture else {
            return;
        };
        let Some(id) = self.document.selected() else {
            return;
        };
        let Some(image) = self.document.selected_image_mut() else {
            return;
        };
        image.center = pos - offset;
        self.event_bus.emit(EditorEvent::LayerTransformed { id });
        self.redraw();
    }

    /// Rescales uniformly so the image covers the pointer on both axes, clamped.
    pub fn resize_image(&mut self, pos: Pos2) {
        if self.gesture != ImageGesture::Resizing {
            return;
        }
        let Some(id) = self.document.selected() else {
            return;
        };
        let Some(image) = self.document.selected_image_mut() else {
            return;
        };
        let delta = pos - image.center;
        let ratio = (delta.x / image.image.width()).max(delta.y / image.image.height());
        image.set_scale(ratio);
        self.event_bus.emit(EditorEvent::LayerTransformed { id });
        self.redraw();
    }

    /// Pointer released or left the canvas: ends every gesture, including a pen stroke.
    pub fn stop_resizing(&mut self) {
        if self.gesture != ImageGesture::Idle {
            debug!("Image gesture ended: {:?}", self.gesture);
            self.gesture = ImageGesture::Idle;
        }
        self.end_drawing();
    }

    // ---- Image import --------------------------------------------------------------

    /// Adds a decoded image as a new layer centred on the canvas at scale 1.
    pub fn insert_image(&mut self, image: LayerImage) -> LayerId {
        let center = self.surface.as_ref().map_or(Pos2::ZERO, Surface::center);
        self.add_layer(LayerContent::Image(ImageContent::new(image, center)))
    }

    /// Starts decoding an uploaded file. The layer appears once
    /// [`EditorState::poll_image_uploads`] sees the decode complete.
    pub fn upload_image(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.queue_image(PendingImage::spawn(name, bytes));
    }

    pub fn queue_image(&mut self, pending: PendingImage) {
        debug!("Queued image upload {}", pending.name());
        self.pending_images.push(pending);
    }

    /// Turns finished decodes into layers; failed ones are logged and dropped.
    pub fn poll_image_uploads(&mut self) -> Vec<LayerId> {
        let mut added = Vec::new();
        let mut waiting = Vec::new();
        for mut pending in std::mem::take(&mut self.pending_images) {
            match pending.try_take() {
                None => waiting.push(pending),
                Some(Ok(image)) => added.push(self.insert_image(image)),
                Some(Err(err)) => {
                    warn!("Image upload {} failed: {err}", pending.name());
                    self.event_bus
                        .emit(EditorEvent::ImageLoadFailed(pending.name().to_owned()));
                }
            }
        }
        self.pending_images = waiting;
        added
    }

    // ---- Canvas ------------------------------------------------------------------------

    pub fn attach_canvas(&mut self, width: u32, height: u32) {
        self.surface = Some(Surface::new(width, height));
        self.event_bus.emit(EditorEvent::CanvasResized { width, height });
        self.redraw();
    }

    /// Follows the container size; repaints on every actual change.
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        match &mut self.surface {
            Some(surface) if surface.width() == width && surface.height() == height => {}
            Some(surface) => {
                surface.resize(width, height);
                self.event_bus.emit(EditorEvent::CanvasResized { width, height });
                self.redraw();
            }
            None => self.attach_canvas(width, height),
        }
    }

    /// Drops the surface; later draws become no-ops until a canvas is attached again.
    pub fn detach_canvas(&mut self) {
        self.surface = None;
    }

    /// Repaints the whole canvas from the layer stack and any stroke in progress.
    pub fn redraw(&mut self) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        let preview = match &self.pen {
            PenState::Drawing { points } => Some(StrokePreview {
                points,
                color: self.settings.color,
                width: self.settings.pen_size,
            }),
            PenState::Idle => None,
        };
        self.renderer.redraw(surface, &self.document, preview);
        self.event_bus.emit(EditorEvent::CanvasRedrawn);
    }

    // ---- Export --------------------------------------------------------------------------

    pub fn encode_canvas_png(&self) -> EditorResult<Vec<u8>> {
        let surface = self.surface.as_ref().ok_or(EditorError::NoCanvas)?;
        export::encode_png(surface.pixels())
    }

    /// Saves the current canvas pixels as `drawing.png` (download on the web).
    pub fn save_canvas_as_image(&self) -> EditorResult<std::path::PathBuf> {
        let surface = self.surface.as_ref().ok_or(EditorError::NoCanvas)?;
        let path = export::save_png(surface.pixels(), &self.config)?;
        self.event_bus.emit(EditorEvent::Exported);
        Ok(path)
    }
}
