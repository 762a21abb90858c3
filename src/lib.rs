#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod image;
pub mod input;
pub mod layer;
pub mod panels;
pub mod renderer;
pub mod state;

pub use app::PaintApp;
pub use config::EditorConfig;
pub use document::Document;
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventBus, EventHandler, EventLog};
pub use history::LayerHistory;
pub use input::{InputEvent, InputHandler, route_event};
pub use layer::{ImageContent, Layer, LayerContent, LayerId, LayerImage, LayerKind, ShapeKind};
pub use renderer::{Renderer, Surface};
pub use state::{EditorState, ImageGesture, PenState, Tool, ToolSettings};
