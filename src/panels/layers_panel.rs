use crate::PaintApp;
use crate::layer::LayerId;

enum LayerAction {
    ToggleVisibility(LayerId),
    Select(LayerId),
    Delete(LayerId),
}

/// Right panel listing layers, top-most first
pub fn layers_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::right("layers_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            ui.separator();

            let mut actions = Vec::new();
            let selected = app.state().selected_layer();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for layer in app.state().layers().iter().rev() {
                    ui.horizontal(|ui| {
                        let mut visible = layer.visible;
                        if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                            actions.push(LayerAction::ToggleVisibility(layer.id));
                        }
                        let label = format!("{} ({})", layer.name, layer.kind().as_str());
                        if ui.selectable_label(selected == Some(layer.id), label).clicked() {
                            actions.push(LayerAction::Select(layer.id));
                        }
                        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                            actions.push(LayerAction::Delete(layer.id));
                        }
                    });
                }
            });

            if app.state().layers().is_empty() {
                ui.weak("No layers yet");
            }

            let state = app.state_mut();
            for action in actions {
                match action {
                    LayerAction::ToggleVisibility(id) => state.toggle_layer_visibility(id),
                    LayerAction::Select(id) => state.select_layer(id),
                    LayerAction::Delete(id) => state.delete_layer(id),
                }
            }
        });
}
