use crate::PaintApp;
use crate::input::{cursor_at, route_event};

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let size = ui.available_size();
            let pixels_per_point = ctx.pixels_per_point();
            // The canvas follows its container in physical pixels; never zero-sized
            let width = (size.x * pixels_per_point).round().max(1.0) as u32;
            let height = (size.y * pixels_per_point).round().max(1.0) as u32;
            app.state_mut().resize_canvas(width, height);

            let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            let (state, input) = app.state_and_input();
            input.set_canvas_rect(canvas_rect);
            input.set_pixels_per_point(pixels_per_point);
            for event in input.process_input(ctx, &response) {
                route_event(&event, state);
            }

            if let Some(pos) = app.input().hover_pos() {
                ctx.set_cursor_icon(cursor_at(app.state(), pos).cursor_icon());
            }

            if let Some(texture) = app.canvas_texture(ctx) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), canvas_rect, uv, egui::Color32::WHITE);
            }
        });
}
