use crate::config::EditorConfig;
use crate::event::RepaintFlag;
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels;
use crate::state::{EditorState, ToolSettings};

/// What survives a restart. Layers are deliberately not part of it.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct PersistedState {
    settings: ToolSettings,
    config: EditorConfig,
}

pub struct PaintApp {
    state: EditorState,
    input: InputHandler,
    file_handler: FileHandler,
    repaint: RepaintFlag,
    texture: Option<egui::TextureHandle>,
    /// Path typed into the native "Open" field
    image_path: String,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::from_persisted(PersistedState::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let persisted = cc
            .storage
            .and_then(|storage| eframe::get_value::<PersistedState>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        log::info!("Starting with tool {:?}", persisted.settings.tool);
        Self::from_persisted(persisted)
    }

    fn from_persisted(persisted: PersistedState) -> Self {
        let state = EditorState::with_config(persisted.config, persisted.settings);
        let repaint = RepaintFlag::new();
        state.subscribe(Box::new(repaint.clone()));
        Self {
            state,
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            repaint,
            texture: None,
            image_path: String::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    /// Editor state and input handler together, for routing canvas events
    pub fn state_and_input(&mut self) -> (&mut EditorState, &mut InputHandler) {
        (&mut self.state, &mut self.input)
    }

    pub fn image_path_mut(&mut self) -> &mut String {
        &mut self.image_path
    }

    /// Reads the typed path and starts decoding it.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_image_path(&mut self) {
        let path = self.image_path.trim().to_owned();
        if path.is_empty() {
            return;
        }
        match std::fs::read(&path) {
            Ok(bytes) => self.state.upload_image(path, bytes),
            Err(err) => log::warn!("Failed to read image file {path}: {err}"),
        }
    }

    pub fn export_canvas(&self) {
        match self.state.save_canvas_as_image() {
            Ok(path) => log::info!("Exported {}", path.display()),
            Err(err) => log::warn!("Export failed: {err}"),
        }
    }

    /// Uploads the canvas pixels to the GPU texture when they changed.
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        let dirty = self.repaint.take();
        let surface = self.state.surface()?;
        match &mut self.texture {
            Some(texture) if dirty => texture.set(surface.to_color_image(), egui::TextureOptions::NEAREST),
            Some(_) => {}
            None => {
                self.texture = Some(ctx.load_texture(
                    "canvas",
                    surface.to_color_image(),
                    egui::TextureOptions::NEAREST,
                ));
            }
        }
        self.texture.as_ref()
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        for pending in self.file_handler.take_dropped_images(ctx) {
            self.state.queue_image(pending);
        }
        self.file_handler.preview_files_being_dropped(ctx);

        self.state.poll_image_uploads();
        if self.state.pending_uploads() > 0 {
            // Decodes finish off the UI thread; keep polling until they land
            ctx.request_repaint();
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let persisted = PersistedState {
            settings: *self.state.settings(),
            config: self.state.config().clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &persisted);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        panels::toolbar(self, ctx);
        panels::control_panel(self, ctx);
        panels::layers_panel(self, ctx);
        panels::central_panel(self, ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.detach_canvas();
    }
}
