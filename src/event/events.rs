use crate::layer::{LayerId, LayerKind, ShapeKind};
use crate::state::Tool;
use egui::Color32;

/// Notifications emitted by `EditorState` after each mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged {
        old: Tool,
        new: Tool,
    },
    ColorChanged(Color32),
    ShapeChanged(ShapeKind),
    PenSizeChanged(f32),
    LayerAdded {
        id: LayerId,
        kind: LayerKind,
    },
    LayerRemoved {
        id: LayerId,
    },
    VisibilityChanged {
        id: LayerId,
        visible: bool,
    },
    /// An image layer was moved or rescaled in place
    LayerTransformed {
        id: LayerId,
    },
    SelectionChanged(Option<LayerId>),
    /// Undo replaced the layer stack with a snapshot
    HistoryRestored {
        remaining: usize,
    },
    StrokeStarted,
    StrokeDiscarded,
    CanvasResized {
        width: u32,
        height: u32,
    },
    /// The canvas pixels were repainted from the layer stack
    CanvasRedrawn,
    ImageLoadFailed(String),
    Exported,
}
