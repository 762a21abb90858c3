use eframe::egui;
use std::collections::HashSet;

use crate::error::EditorResult;
use crate::image::PendingImage;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Turns files dropped onto the window into pending image decodes
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects this frame's dropped files and starts decoding the image ones.
    pub fn take_dropped_images(&self, ctx: &egui::Context) -> Vec<PendingImage> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        self.process_dropped_files(&dropped)
    }

    /// Each file in one drop is loaded once; dropping it again later loads it again.
    pub fn process_dropped_files(&self, files: &[egui::DroppedFile]) -> Vec<PendingImage> {
        let mut pending = Vec::new();
        let mut seen = HashSet::new();

        for file in files {
            let file_name = display_name(file);

            if seen.contains(&file_name) {
                continue;
            }
            if !is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {file_name}");
                continue;
            }

            match read_bytes(file) {
                Ok(Some(bytes)) => {
                    log::info!("Loading dropped image {file_name} ({} bytes)", bytes.len());
                    pending.push(PendingImage::spawn(file_name.clone(), bytes));
                    seen.insert(file_name);
                }
                Ok(None) => log::warn!("Dropped file has no accessible data: {file_name}"),
                Err(err) => log::warn!("Failed to read dropped file {file_name}: {err}"),
            }
        }

        pending
    }

    /// Overlay listing files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n???";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Checks the MIME type first, then falls back to the extension of the path or name
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = match &file.path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => file.name.clone(),
    };
    std::path::Path::new(&name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn read_bytes(file: &egui::DroppedFile) -> EditorResult<Option<Vec<u8>>> {
    if let Some(bytes) = &file.bytes {
        return Ok(Some(bytes.to_vec()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return Ok(Some(std::fs::read(path)?));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn named(name: &str, mime: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            mime: mime.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_filter() {
        assert!(is_image_file(&named("cat.PNG", "")));
        assert!(is_image_file(&named("cat.jpeg", "")));
        assert!(is_image_file(&named("blob", "image/webp")));
        assert!(!is_image_file(&named("notes.txt", "")));
        assert!(!is_image_file(&named("cat.png", "text/plain")));
        assert!(!is_image_file(&named("", "")));
    }

    #[test]
    fn test_duplicates_within_one_drop_load_once() {
        let mut file = named("a.png", "image/png");
        file.bytes = Some(Arc::from(vec![1u8, 2, 3]));
        let handler = FileHandler::new();

        assert_eq!(handler.process_dropped_files(&[file.clone(), file]).len(), 1);
    }

    #[test]
    fn test_same_file_can_be_dropped_again() {
        let mut file = named("a.png", "image/png");
        file.bytes = Some(Arc::from(vec![1u8, 2, 3]));
        let handler = FileHandler::new();

        assert_eq!(handler.process_dropped_files(&[file.clone()]).len(), 1);
        assert_eq!(handler.process_dropped_files(&[file]).len(), 1);
    }

    #[test]
    fn test_files_without_data_are_skipped() {
        let handler = FileHandler::new();
        assert!(handler.process_dropped_files(&[named("a.png", "")]).is_empty());
        assert!(handler.process_dropped_files(&[named("a.txt", "")]).is_empty());
    }
}
