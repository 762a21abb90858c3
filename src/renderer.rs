use egui::{Color32, ColorImage, Pos2, Rect, Vec2};
use image::{Pixel, Rgba, RgbaImage};

use crate::document::Document;
use crate::geometry::{distance_to_line_segment, point_in_triangle};
use crate::layer::{ImageContent, Layer, LayerContent, SHAPE_HALF_EXTENT, ShapeKind};

/// The canvas pixel buffer every redraw paints into.
#[derive(Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn center(&self) -> Pos2 {
        (self.size() / 2.0).to_pos2()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Reads back one pixel, `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let Rgba([r, g, b, a]) = *self.pixels.get_pixel_checked(x, y)?;
        Some(Color32::from_rgba_unmultiplied(r, g, b, a))
    }

    /// Reallocates the buffer; contents are undefined until the next redraw
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width() != width || self.height() != height {
            self.pixels = RgbaImage::new(width, height);
        }
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }
}

/// An in-progress pen stroke painted on top of the layer pass
#[derive(Debug, Clone, Copy)]
pub struct StrokePreview<'a> {
    pub points: &'a [Pos2],
    pub color: Color32,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    background: Color32,
    handle_color: Color32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            handle_color: Color32::BLACK,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repaints the surface from scratch: background, visible layers bottom to top,
    /// then the in-progress stroke if any.
    pub fn redraw(&self, surface: &mut Surface, document: &Document, preview: Option<StrokePreview<'_>>) {
        fill(surface, self.background);

        for layer in document.layers().iter().filter(|layer| layer.visible) {
            let selected = document.selected() == Some(layer.id);
            self.draw_layer(surface, layer, selected);
        }

        if let Some(preview) = preview {
            stroke_polyline(surface, preview.points, preview.color, preview.width);
        }
    }

    fn draw_layer(&self, surface: &mut Surface, layer: &Layer, selected: bool) {
        match &layer.content {
            LayerContent::Fill { color } => fill(surface, *color),
            LayerContent::Shape { anchor, kind, color } => fill_shape(surface, *anchor, *kind, *color),
            LayerContent::Pen { points, color, width } => stroke_polyline(surface, points, *color, *width),
            LayerContent::Image(image) => {
                draw_image(surface, image);
                if selected {
                    outline_rect(surface, image.resize_handle(), self.handle_color);
                }
            }
        }
    }
}

fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Integer pixel span `[start, end)` covering `bounds`, clipped to the surface
fn pixel_span(surface: &Surface, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
    if !bounds.is_finite() || surface.width() == 0 || surface.height() == 0 {
        return None;
    }
    // Negative floats saturate to 0 on cast
    let x0 = bounds.min.x.floor().max(0.0) as u32;
    let y0 = bounds.min.y.floor().max(0.0) as u32;
    let x1 = (bounds.max.x.ceil().max(0.0) as u32).min(surface.width());
    let y1 = (bounds.max.y.ceil().max(0.0) as u32).min(surface.height());
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Blends `color` into every pixel in `bounds` whose centre satisfies `covered`
fn paint_where(surface: &mut Surface, bounds: Rect, color: Color32, covered: impl Fn(Pos2) -> bool) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, bounds) else {
        return;
    };
    let rgba = to_rgba(color);
    for y in y0..y1 {
        for x in x0..x1 {
            if covered(Pos2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                surface.pixels.get_pixel_mut(x, y).blend(&rgba);
            }
        }
    }
}

/// Paints the entire surface one colour
pub fn fill(surface: &mut Surface, color: Color32) {
    if color.is_opaque() {
        let rgba = to_rgba(color);
        for pixel in surface.pixels.pixels_mut() {
            *pixel = rgba;
        }
    } else {
        let bounds = Rect::from_min_size(Pos2::ZERO, surface.size());
        paint_where(surface, bounds, color, |_| true);
    }
}

/// Paints one fixed-size primitive centred on `anchor`
pub fn fill_shape(surface: &mut Surface, anchor: Pos2, kind: ShapeKind, color: Color32) {
    let bounds = Rect::from_center_size(anchor, Vec2::splat(SHAPE_HALF_EXTENT * 2.0));
    match kind {
        ShapeKind::Circle => {
            paint_where(surface, bounds, color, |p| p.distance(anchor) <= SHAPE_HALF_EXTENT);
        }
        ShapeKind::Rectangle => {
            // Half-open like a canvas fillRect
            paint_where(surface, bounds, color, |p| {
                p.x >= bounds.min.x && p.x < bounds.max.x && p.y >= bounds.min.y && p.y < bounds.max.y
            });
        }
        ShapeKind::Triangle => {
            let apex = Pos2::new(anchor.x, anchor.y - SHAPE_HALF_EXTENT);
            let right = Pos2::new(anchor.x + SHAPE_HALF_EXTENT, anchor.y + SHAPE_HALF_EXTENT);
            let left = Pos2::new(anchor.x - SHAPE_HALF_EXTENT, anchor.y + SHAPE_HALF_EXTENT);
            paint_where(surface, bounds, color, |p| point_in_triangle(p, apex, right, left));
        }
    }
}

/// Strokes a polyline with round joins and caps. Fewer than two points draws nothing.
pub fn stroke_polyline(surface: &mut Surface, points: &[Pos2], color: Color32, width: f32) {
    if points.len() < 2 || width <= 0.0 {
        return;
    }
    let radius = width / 2.0;
    let bounds = Rect::from_points(points).expand(radius);
    let Some((x0, y0, x1, y1)) = pixel_span(surface, bounds) else {
        return;
    };

    // Coverage mask so overlapping segments blend each pixel once
    let span_w = (x1 - x0) as usize;
    let mut mask = vec![false; span_w * (y1 - y0) as usize];
    for segment in points.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let Some((sx0, sy0, sx1, sy1)) = pixel_span(surface, Rect::from_two_pos(a, b).expand(radius)) else {
            continue;
        };
        for y in sy0..sy1 {
            for x in sx0..sx1 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_line_segment(center, a, b) <= radius {
                    mask[(y - y0) as usize * span_w + (x - x0) as usize] = true;
                }
            }
        }
    }

    let rgba = to_rgba(color);
    for (index, _) in mask.iter().enumerate().filter(|(_, covered)| **covered) {
        let x = x0 + (index % span_w) as u32;
        let y = y0 + (index / span_w) as u32;
        surface.pixels.get_pixel_mut(x, y).blend(&rgba);
    }
}

/// Draws the image scaled about its centre, alpha-composited over the surface.
///
/// Only the on-canvas part is visited; each covered pixel samples its nearest source
/// texel, so the cost is bounded by the surface size whatever the scale.
pub fn draw_image(surface: &mut Surface, image: &ImageContent) {
    let bounds = image.bounds();
    let Some((x0, y0, x1, y1)) = pixel_span(surface, bounds) else {
        return;
    };
    let source = image.image.pixels();
    let (src_w, src_h) = (source.width(), source.height());
    if src_w == 0 || src_h == 0 {
        return;
    }
    let scale = image.scale();

    for y in y0..y1 {
        let cy = y as f32 + 0.5;
        if cy < bounds.min.y || cy >= bounds.max.y {
            continue;
        }
        let sy = (((cy - bounds.min.y) / scale) as u32).min(src_h - 1);
        for x in x0..x1 {
            let cx = x as f32 + 0.5;
            if cx < bounds.min.x || cx >= bounds.max.x {
                continue;
            }
            let sx = (((cx - bounds.min.x) / scale) as u32).min(src_w - 1);
            surface.pixels.get_pixel_mut(x, y).blend(source.get_pixel(sx, sy));
        }
    }
}

/// One-pixel outline along the inside of `rect`
pub fn outline_rect(surface: &mut Surface, rect: Rect, color: Color32) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };
    let left = rect.min.x.floor();
    let top = rect.min.y.floor();
    let right = rect.max.x.ceil() - 1.0;
    let bottom = rect.max.y.ceil() - 1.0;
    let rgba = to_rgba(color);
    for y in y0..y1 {
        for x in x0..x1 {
            let (fx, fy) = (x as f32, y as f32);
            if fx == left || fx == right || fy == top || fy == bottom {
                surface.pixels.get_pixel_mut(x, y).blend(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerImage;

    const BLUE: Color32 = Color32::from_rgb(0x1E, 0x90, 0xFF);
    const TOMATO: Color32 = Color32::from_rgb(0xFF, 0x63, 0x47);

    #[test]
    fn test_fill_covers_everything() {
        let mut surface = Surface::new(8, 6);
        fill(&mut surface, BLUE);
        assert!(surface.pixels().pixels().all(|p| *p == to_rgba(BLUE)));
    }

    #[test]
    fn test_circle_radius() {
        let mut surface = Surface::new(200, 200);
        fill(&mut surface, Color32::WHITE);
        fill_shape(&mut surface, Pos2::new(100.0, 100.0), ShapeKind::Circle, TOMATO);
        assert_eq!(surface.pixel(100, 100), Some(TOMATO));
        assert_eq!(surface.pixel(100, 51), Some(TOMATO));
        assert_eq!(surface.pixel(100, 48), Some(Color32::WHITE));
        // Square corner lies outside the circle
        assert_eq!(surface.pixel(55, 55), Some(Color32::WHITE));
    }

    #[test]
    fn test_rectangle_extent() {
        let mut surface = Surface::new(200, 200);
        fill(&mut surface, Color32::WHITE);
        fill_shape(&mut surface, Pos2::new(100.0, 100.0), ShapeKind::Rectangle, TOMATO);
        assert_eq!(surface.pixel(50, 50), Some(TOMATO));
        assert_eq!(surface.pixel(149, 149), Some(TOMATO));
        assert_eq!(surface.pixel(150, 100), Some(Color32::WHITE));
        assert_eq!(surface.pixel(49, 100), Some(Color32::WHITE));
    }

    #[test]
    fn test_triangle_points_up() {
        let mut surface = Surface::new(200, 200);
        fill(&mut surface, Color32::WHITE);
        fill_shape(&mut surface, Pos2::new(100.0, 100.0), ShapeKind::Triangle, TOMATO);
        assert_eq!(surface.pixel(100, 140), Some(TOMATO));
        assert_eq!(surface.pixel(55, 145), Some(TOMATO));
        // Top corners are outside the triangle
        assert_eq!(surface.pixel(55, 55), Some(Color32::WHITE));
        assert_eq!(surface.pixel(145, 55), Some(Color32::WHITE));
    }

    #[test]
    fn test_shape_partially_off_canvas() {
        let mut surface = Surface::new(40, 40);
        fill(&mut surface, Color32::WHITE);
        fill_shape(&mut surface, Pos2::new(0.0, 0.0), ShapeKind::Rectangle, TOMATO);
        assert_eq!(surface.pixel(0, 0), Some(TOMATO));
        assert_eq!(surface.pixel(39, 39), Some(TOMATO));

        fill_shape(&mut surface, Pos2::new(-500.0, -500.0), ShapeKind::Circle, BLUE);
        assert_eq!(surface.pixel(0, 0), Some(TOMATO));
    }

    #[test]
    fn test_polyline_round_caps() {
        let mut surface = Surface::new(60, 30);
        fill(&mut surface, Color32::WHITE);
        let points = [Pos2::new(10.0, 15.0), Pos2::new(50.0, 15.0)];
        stroke_polyline(&mut surface, &points, Color32::BLACK, 6.0);
        assert_eq!(surface.pixel(30, 15), Some(Color32::BLACK));
        assert_eq!(surface.pixel(30, 12), Some(Color32::BLACK));
        assert_eq!(surface.pixel(30, 20), Some(Color32::WHITE));
        // Cap extends past the endpoint by the radius
        assert_eq!(surface.pixel(52, 15), Some(Color32::BLACK));
        assert_eq!(surface.pixel(55, 15), Some(Color32::WHITE));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut surface = Surface::new(20, 20);
        fill(&mut surface, Color32::WHITE);
        stroke_polyline(&mut surface, &[Pos2::new(10.0, 10.0)], Color32::BLACK, 8.0);
        assert!(surface.pixels().pixels().all(|p| *p == to_rgba(Color32::WHITE)));
    }

    #[test]
    fn test_translucent_stroke_blends_once_at_joins() {
        let mut surface = Surface::new(40, 40);
        fill(&mut surface, Color32::WHITE);
        let half_red = Color32::from_rgba_unmultiplied(255, 0, 0, 128);
        let points = [Pos2::new(10.0, 10.0), Pos2::new(30.0, 10.0), Pos2::new(30.0, 30.0)];
        stroke_polyline(&mut surface, &points, half_red, 4.0);
        // The join pixel is covered by both segments but must match a single-segment pixel
        assert_eq!(surface.pixel(30, 10), surface.pixel(20, 10));
    }

    #[test]
    fn test_draw_image_scaled_about_center() {
        let red = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let mut content = ImageContent::new(LayerImage::new(red), Pos2::new(50.0, 50.0));
        content.set_scale(2.0);

        let mut surface = Surface::new(100, 100);
        fill(&mut surface, Color32::WHITE);
        draw_image(&mut surface, &content);
        assert_eq!(surface.pixel(40, 40), Some(Color32::RED));
        assert_eq!(surface.pixel(59, 59), Some(Color32::RED));
        assert_eq!(surface.pixel(39, 50), Some(Color32::WHITE));
        assert_eq!(surface.pixel(60, 50), Some(Color32::WHITE));
    }

    #[test]
    fn test_draw_image_samples_nearest_texel() {
        let mut checker = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
        checker.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let mut content = ImageContent::new(LayerImage::new(checker), Pos2::new(10.0, 10.0));
        content.set_scale(3.0);

        // Bounds span (7, 8.5)..(13, 11.5); left texel covers x 7..10, right texel 10..13
        let mut surface = Surface::new(20, 20);
        fill(&mut surface, Color32::WHITE);
        draw_image(&mut surface, &content);
        assert_eq!(surface.pixel(7, 10), Some(Color32::RED));
        assert_eq!(surface.pixel(9, 10), Some(Color32::RED));
        assert_eq!(surface.pixel(10, 10), Some(Color32::BLUE));
        assert_eq!(surface.pixel(12, 10), Some(Color32::BLUE));
        assert_eq!(surface.pixel(13, 10), Some(Color32::WHITE));
    }

    #[test]
    fn test_draw_image_mostly_off_canvas() {
        // 3x scale of a large image: only the visible corner is painted
        let big = RgbaImage::from_pixel(2000, 1500, Rgba([0, 255, 0, 255]));
        let mut content = ImageContent::new(LayerImage::new(big), Pos2::new(-2990.0, -2240.0));
        content.set_scale(3.0);

        let mut surface = Surface::new(16, 16);
        fill(&mut surface, Color32::WHITE);
        draw_image(&mut surface, &content);
        // Bounds end at (10, 10)
        assert_eq!(surface.pixel(0, 0), Some(Color32::GREEN));
        assert_eq!(surface.pixel(9, 9), Some(Color32::GREEN));
        assert_eq!(surface.pixel(10, 9), Some(Color32::WHITE));
        assert_eq!(surface.pixel(15, 15), Some(Color32::WHITE));
    }

    #[test]
    fn test_translucent_image_blends_over_background() {
        let half = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let content = ImageContent::new(LayerImage::new(half), Pos2::new(5.0, 5.0));
        let mut surface = Surface::new(10, 10);
        fill(&mut surface, Color32::WHITE);
        draw_image(&mut surface, &content);
        assert_eq!(surface.pixel(5, 5), Some(Color32::WHITE));
    }

    #[test]
    fn test_outline_rect_leaves_interior() {
        let mut surface = Surface::new(30, 30);
        fill(&mut surface, Color32::WHITE);
        outline_rect(&mut surface, Rect::from_min_size(Pos2::new(5.0, 5.0), Vec2::splat(16.0)), Color32::BLACK);
        assert_eq!(surface.pixel(5, 5), Some(Color32::BLACK));
        assert_eq!(surface.pixel(20, 12), Some(Color32::BLACK));
        assert_eq!(surface.pixel(12, 12), Some(Color32::WHITE));
        assert_eq!(surface.pixel(21, 12), Some(Color32::WHITE));
    }

    #[test]
    fn test_surface_resize_and_color_image() {
        let mut surface = Surface::new(4, 4);
        surface.resize(10, 3);
        assert_eq!((surface.width(), surface.height()), (10, 3));
        assert_eq!(surface.center(), Pos2::new(5.0, 1.5));
        assert_eq!(surface.to_color_image().size, [10, 3]);
        assert_eq!(surface.pixel(10, 0), None);
    }
}
