use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Half the width/height of every shape primitive (circle radius, square half side).
pub const SHAPE_HALF_EXTENT: f32 = 50.0;

pub const MIN_IMAGE_SCALE: f32 = 0.1;
pub const MAX_IMAGE_SCALE: f32 = 3.0;

/// Side length of the square resize handle shown on the selected image.
pub const RESIZE_HANDLE_SIZE: f32 = 16.0;

/// A unique identifier for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl LayerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Circle,
    Rectangle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Rectangle, ShapeKind::Triangle];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Triangle => "Triangle",
        }
    }
}

/// Discriminant of a layer's content, used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Shape,
    Fill,
    Pen,
    Image,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Shape => "SHAPE",
            LayerKind::Fill => "FILL",
            LayerKind::Pen => "PEN",
            LayerKind::Image => "IMAGE",
        }
    }
}

/// Decoded raster image shared between a layer and its undo snapshots.
///
/// Pixel data is never mutated after decode, so clones share one buffer.
#[derive(Clone)]
pub struct LayerImage {
    pixels: Arc<RgbaImage>,
}

impl LayerImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> f32 {
        self.pixels.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.pixels.height() as f32
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }
}

// Custom Debug so logs don't dump the pixel buffer
impl fmt::Debug for LayerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerImage")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl PartialEq for LayerImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// A placed raster image: native pixels drawn centred at `center`, uniformly scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    pub image: LayerImage,
    pub center: Pos2,
    scale: f32,
}

impl ImageContent {
    pub fn new(image: LayerImage, center: Pos2) -> Self {
        Self {
            image,
            center,
            scale: 1.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets the scale, clamped to `[MIN_IMAGE_SCALE, MAX_IMAGE_SCALE]`.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_nan() {
            MIN_IMAGE_SCALE
        } else {
            scale.clamp(MIN_IMAGE_SCALE, MAX_IMAGE_SCALE)
        };
    }

    pub fn scaled_size(&self) -> Vec2 {
        self.image.size() * self.scale
    }

    /// On-canvas bounds of the scaled image.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.scaled_size())
    }

    /// Hit box of the resize handle, centred on the scaled bottom-right corner.
    pub fn resize_handle(&self) -> Rect {
        Rect::from_center_size(self.bounds().right_bottom(), Vec2::splat(RESIZE_HANDLE_SIZE))
    }
}

/// Drawable payload of a layer. One variant per tool that commits layers.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Shape {
        anchor: Pos2,
        kind: ShapeKind,
        color: Color32,
    },
    Fill {
        color: Color32,
    },
    Pen {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
    },
    Image(ImageContent),
}

impl LayerContent {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerContent::Shape { .. } => LayerKind::Shape,
            LayerContent::Fill { .. } => LayerKind::Fill,
            LayerContent::Pen { .. } => LayerKind::Pen,
            LayerContent::Image(_) => LayerKind::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Content of the layer
    pub content: LayerContent,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, content: LayerContent) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            content,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.content {
            LayerContent::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageContent> {
        match &mut self.content {
            LayerContent::Image(image) => Some(image),
            _ => None,
        }
    }
}
