mod editor_state;
mod settings;

pub use editor_state::{EditorState, ImageGesture, PenState};
pub use settings::{Tool, ToolSettings};
