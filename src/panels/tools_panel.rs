use crate::PaintApp;
use crate::components::ToolButton;
use crate::layer::ShapeKind;
use crate::state::Tool;

/// Top bar: tool buttons, undo and save
pub fn toolbar(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let active = app.state().selected_tool();
            for tool in Tool::SELECTABLE {
                let response = ToolButton::new(tool, active == tool).show(ui);
                if response.clicked() {
                    log::info!("Tool selected from UI: {}", tool.label());
                    app.state_mut().set_selected_tool(tool);
                }
            }

            ui.separator();

            let can_undo = app.state().can_undo();
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                app.state_mut().undo();
            }
            if ui
                .add_enabled(app.state().has_canvas(), egui::Button::new("💾 Save"))
                .clicked()
            {
                app.export_canvas();
            }
        });
    });
}

/// Left panel with the options of the active tool
pub fn control_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("control_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Color");
            color_palette(app, ui);
            ui.separator();

            match app.state().selected_tool() {
                Tool::Shape => {
                    ui.heading("Shape");
                    for shape in ShapeKind::ALL {
                        let selected = app.state().selected_shape() == shape;
                        if ui.selectable_label(selected, shape.label()).clicked() {
                            app.state_mut().set_selected_shape(shape);
                        }
                    }
                }
                Tool::Pen => {
                    ui.heading("Pen size");
                    let sizes = app.state().config().pen_sizes.clone();
                    ui.horizontal_wrapped(|ui| {
                        for size in sizes {
                            let selected = app.state().pen_size() == size;
                            if ui.selectable_label(selected, format!("{size}")).clicked() {
                                app.state_mut().set_pen_size(size);
                            }
                        }
                    });
                }
                Tool::Image => image_controls(app, ui),
                Tool::Fill => {
                    ui.label("Click the canvas to fill it.");
                }
                Tool::None => {
                    ui.label("Pick a tool to start drawing.");
                }
            }
        });
}

fn color_palette(app: &mut PaintApp, ui: &mut egui::Ui) {
    let palette = app.state().config().palette.clone();
    ui.horizontal_wrapped(|ui| {
        for color in palette {
            let selected = app.state().selected_color() == color;
            let stroke = if selected {
                egui::Stroke::new(2.0, ui.visuals().strong_text_color())
            } else {
                egui::Stroke::NONE
            };
            let swatch = egui::Button::new("")
                .fill(color)
                .stroke(stroke)
                .min_size(egui::vec2(24.0, 24.0));
            if ui.add(swatch).clicked() {
                app.state_mut().set_selected_color(color);
            }
        }
    });
}

fn image_controls(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Image");
    ui.label("Drop an image file onto the window.");

    #[cfg(not(target_arch = "wasm32"))]
    ui.horizontal(|ui| {
        ui.text_edit_singleline(app.image_path_mut());
        if ui.button("Open…").clicked() {
            app.open_image_path();
        }
    });

    if app.state().pending_uploads() > 0 {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Decoding…");
        });
    }
    if app.state().document().selected_image().is_some() {
        ui.label("Drag to move, drag the corner handle to resize.");
    }
}
