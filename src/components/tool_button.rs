use eframe::egui;

use crate::state::Tool;

const SELECTED_FILL: egui::Color32 = egui::Color32::from_rgb(100, 181, 246);
const SELECTED_BORDER: egui::Color32 = egui::Color32::from_rgb(33, 150, 243);

/// Square icon button for one tool; the tool name shows on hover
pub struct ToolButton {
    pub tool: Tool,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(tool: Tool, selected: bool) -> Self {
        Self { tool, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let size = egui::Vec2::splat(ui.spacing().interact_size.y * 1.6);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact_selectable(&response, self.selected);
            let (fill, text_color, border) = if self.selected {
                (SELECTED_FILL, egui::Color32::BLACK, egui::Stroke::new(2.0, SELECTED_BORDER))
            } else {
                (visuals.weak_bg_fill, visuals.text_color(), visuals.bg_stroke)
            };

            let painter = ui.painter();
            painter.rect(rect, visuals.rounding, fill, border);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(rect.height() * 0.6),
                text_color,
            );
        }

        response.on_hover_text(self.tool.label())
    }
}
