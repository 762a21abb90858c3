use crate::layer::{ImageContent, Layer, LayerContent, LayerId};

/// The ordered layer stack. Index 0 is painted first (bottom).
#[derive(Debug, Clone)]
pub struct Document {
    layers: Vec<Layer>,
    next_id: u64,
    selected: Option<LayerId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            next_id: 1,
            selected: None,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Appends a layer on top of the stack and returns its freshly allocated id.
    ///
    /// Ids are never handed out twice within a document's lifetime.
    pub fn push(&mut self, content: LayerContent) -> LayerId {
        let id = LayerId::new(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer::new(id, format!("Layer {id}"), content));
        id
    }

    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.index_of(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.layers.remove(index))
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Flips visibility in place, returning the new value.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.get_mut(id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn select(&mut self, id: LayerId) {
        if self.contains(id) {
            self.selected = Some(id);
        }
    }

    /// Selects `id`, or clears the selection if it is already selected.
    pub fn toggle_selection(&mut self, id: LayerId) {
        if self.selected == Some(id) {
            self.selected = None;
        } else {
            self.select(id);
        }
    }

    /// The selected layer's image data, if the selection is an image layer.
    pub fn selected_image(&self) -> Option<&ImageContent> {
        self.get(self.selected?)?.as_image()
    }

    pub fn selected_image_mut(&mut self) -> Option<&mut ImageContent> {
        let id = self.selected?;
        self.get_mut(id)?.as_image_mut()
    }

    /// Replaces the whole stack (undo restore). The id allocator is left untouched.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
        if let Some(id) = self.selected {
            if !self.contains(id) {
                self.selected = None;
            }
        }
    }
}
