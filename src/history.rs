use crate::layer::Layer;

/// Manages snapshots of the layer stack for linear undo
///
/// A snapshot is pushed before every structural mutation (add, delete) and
/// popped wholesale by undo. There is no redo.
#[derive(Debug, Clone, Default)]
pub struct LayerHistory {
    /// Stack of layer lists, most recent last
    snapshots: Vec<Vec<Layer>>,
    /// Maximum number of snapshots retained, `None` for unbounded
    limit: Option<usize>,
}

impl LayerHistory {
    /// Creates a new empty, unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            snapshots: Vec::new(),
            limit,
        }
    }

    /// Record a copy of the given layer list
    pub fn push_snapshot(&mut self, layers: &[Layer]) {
        self.snapshots.push(layers.to_vec());
        self.enforce_limit();
    }

    /// Take the most recent snapshot off the stack
    pub fn pop_snapshot(&mut self) -> Option<Vec<Layer>> {
        self.snapshots.pop()
    }

    /// Returns true if there is a snapshot to restore
    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.snapshots.len() > limit {
                let excess = self.snapshots.len() - limit;
                self.snapshots.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerContent, LayerId};
    use egui::Color32;

    fn stack(len: u64) -> Vec<Layer> {
        (1..=len)
            .map(|i| Layer::new(LayerId(i), format!("Layer {i}"), LayerContent::Fill { color: Color32::RED }))
            .collect()
    }

    #[test]
    fn test_pop_returns_most_recent_first() {
        let mut history = LayerHistory::new();
        assert!(!history.can_undo());
        history.push_snapshot(&stack(0));
        history.push_snapshot(&stack(1));

        assert_eq!(history.pop_snapshot().map(|s| s.len()), Some(1));
        assert_eq!(history.pop_snapshot().map(|s| s.len()), Some(0));
        assert!(history.pop_snapshot().is_none());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = LayerHistory::with_limit(Some(2));
        history.push_snapshot(&stack(0));
        history.push_snapshot(&stack(1));
        history.push_snapshot(&stack(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop_snapshot().map(|s| s.len()), Some(2));
        assert_eq!(history.pop_snapshot().map(|s| s.len()), Some(1));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut layers = stack(1);
        let mut history = LayerHistory::new();
        history.push_snapshot(&layers);
        layers[0].visible = false;

        let restored = history.pop_snapshot().unwrap_or_default();
        assert!(restored[0].visible);
    }
}
