use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "drawing.png";

/// User-tunable editor configuration, persisted alongside the tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorConfig {
    /// Swatches offered by the control panel
    pub palette: Vec<Color32>,
    /// Pen widths offered by the control panel
    pub pen_sizes: Vec<f32>,
    /// File name used for PNG export (native file and browser download)
    pub export_file_name: String,
    /// Directory the native build writes exports into
    pub export_dir: PathBuf,
    /// Maximum retained undo snapshots, `None` for unbounded
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                Color32::from_rgb(0x1E, 0x90, 0xFF),
                Color32::from_rgb(0xFF, 0x63, 0x47),
                Color32::from_rgb(0x32, 0xCD, 0x32),
                Color32::from_rgb(0xFF, 0xD7, 0x00),
                Color32::from_rgb(0xFF, 0x69, 0xB4),
            ],
            pen_sizes: vec![1.0, 3.0, 5.0, 8.0, 12.0],
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_owned(),
            export_dir: PathBuf::from("."),
            history_limit: None,
        }
    }
}

impl EditorConfig {
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}
