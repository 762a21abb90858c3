use egui::Pos2;

use crate::layer::ImageContent;

/// Distance from a point to a line segment (used for pen stroke coverage)
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Whether `p` lies inside (or on the edge of) the triangle `a b c`, any winding
pub fn point_in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    let edge = |from: Pos2, to: Pos2| (to.x - from.x) * (p.y - from.y) - (to.y - from.y) * (p.x - from.x);
    let d1 = edge(a, b);
    let d2 = edge(b, c);
    let d3 = edge(c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Resize handle hit test, edges inclusive
pub fn is_over_resize_handle(image: &ImageContent, pos: Pos2) -> bool {
    image.resize_handle().contains(pos)
}

/// Image body hit test against the scaled bounds, edges inclusive
pub fn is_over_image(image: &ImageContent, pos: Pos2) -> bool {
    image.bounds().contains(pos)
}
