use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::layer::ShapeKind;

/// The active canvas tool. Nothing reacts to the canvas until one is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    None,
    Shape,
    Fill,
    Pen,
    Image,
}

impl Tool {
    pub const SELECTABLE: [Tool; 4] = [Tool::Shape, Tool::Fill, Tool::Pen, Tool::Image];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::None => "None",
            Tool::Shape => "Shape",
            Tool::Fill => "Fill",
            Tool::Pen => "Pen",
            Tool::Image => "Image",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::None => " ",
            Tool::Shape => "⏹",
            Tool::Fill => "🎨",
            Tool::Pen => "✏",
            Tool::Image => "🖼",
        }
    }
}

/// Current tool selection; persisted between sessions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: Color32,
    pub shape: ShapeKind,
    pub pen_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::None,
            color: Color32::from_rgb(0x1E, 0x90, 0xFF),
            shape: ShapeKind::Circle,
            pen_size: 3.0,
        }
    }
}
